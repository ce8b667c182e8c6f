//! VCFtools: filtering and sorting VCF files.
//!
//! Link: https://vcftools.github.io/man_latest.html

use crate::tool::{
    CommandToolBuilder, Selector, Tool, ToolArgument, ToolInput, ToolMetadata, ToolOutput,
    VersionInfo,
};
use crate::tools::{versioned, MAINTAINERS};
use crate::types::annotation::Bed;
use crate::types::variants::Vcf;
use crate::types::{Filename, Type};

/// The VCFtools releases the definitions are published for.
pub fn versions() -> Vec<VersionInfo> {
    vec![VersionInfo::new(
        "0.1.16",
        "biocontainers/vcftools:v0.1.16-1-deb_cv1",
    )]
}

pub(crate) fn definitions() -> Vec<anyhow::Result<Tool>> {
    let versions = versions();
    [vcftools(), sort()]
        .into_iter()
        .flat_map(|builder| versioned(builder, &versions))
        .collect()
}

fn metadata() -> ToolMetadata {
    ToolMetadata::new()
        .contributor(MAINTAINERS)
        .doi("https://doi.org/10.1093/bioinformatics/btr330")
        .citation(
            "The Variant Call Format and VCFtools, Petr Danecek, Adam Auton, Goncalo Abecasis, \
            Cornelis A. Albers, Eric Banks, Mark A. DePristo, Robert Handsaker, Gerton Lunter, \
            Gabor Marth, Stephen T. Sherry, Gilean McVean, Richard Durbin and 1000 Genomes Project \
            Analysis Group, Bioinformatics, 2011",
        )
        .keywords(["vcftools"])
}

fn vcftools() -> CommandToolBuilder {
    CommandToolBuilder::new("VcfTools")
        .friendly_name("VcfTools")
        .tool_provider("VCFtools")
        .base_command(["vcftools"])
        .inputs([
            ToolInput::new("vcf", Type::file(Vcf))
                .prefix("--vcf")
                .doc("This option defines the VCF file to be processed."),
            ToolInput::new(
                "outputFilename",
                Type::Filename(Filename::default().prefix("vcf").suffix(".vcftools")),
            )
            .prefix("--out")
            .doc("This option defines the output filename prefix for all files generated by vcftools."),
            ToolInput::new("removeFileteredAll", Type::Boolean.optional())
                .prefix("--remove-filtered-all")
                .doc("Removes all sites with a FILTER flag other than PASS."),
            ToolInput::new("chromosome", Type::String.optional())
                .prefix("--chr")
                .doc("Includes sites with matching chromosome identifiers."),
            ToolInput::new("fromBp", Type::Int.optional())
                .prefix("--from-bp")
                .doc("Specifies the lower bound of a range of sites to be processed. Must be used with --chr."),
            ToolInput::new("toBp", Type::Int.optional())
                .prefix("--to-bp")
                .doc("Specifies the upper bound of a range of sites to be processed. Must be used with --chr."),
            ToolInput::new("bed", Type::file(Bed).optional())
                .prefix("--bed")
                .doc("Include a set of sites on the basis of a BED file."),
            ToolInput::new("minQ", Type::Float.optional())
                .prefix("--minQ")
                .doc("Includes only sites with Quality value above this threshold."),
            ToolInput::new("recode", Type::Boolean.optional())
                .prefix("--recode")
                .default(true)
                .doc("Generate a new file in VCF format from the input VCF file after applying the filtering options."),
            ToolInput::new("recodeINFOAll", Type::Boolean.optional())
                .prefix("--recode-INFO-all")
                .default(true)
                .doc("Keep all INFO values in the original file when recoding."),
        ])
        .output(
            ToolOutput::new(
                "out",
                Type::file(Vcf),
                Selector::Wildcard("*.recode.vcf".into()),
            )
            .doc("The filtered VCF."),
        )
        .metadata(
            metadata()
                .dates((2019, 5, 10), (2019, 5, 10))
                .documentation(
                    "The vcftools program is run from the command line. The interface is inspired \
                    by PLINK, and so should be familiar to users of that package. Commands take \
                    the form: vcftools --vcf file1.vcf --chr 20 --freq. The output of a filter run \
                    is recoded with --recode to a file named <out>.recode.vcf.",
                )
                .documentation_url("https://vcftools.github.io/man_latest.html"),
        )
}

fn sort() -> CommandToolBuilder {
    CommandToolBuilder::new("VcfToolsSort")
        .friendly_name("VcfTools: Sort")
        .tool_provider("VCFtools")
        .base_command(["vcf-sort"])
        .argument(ToolArgument::new("-c").doc("Use natural ordering (1,2,10,MT,X) rather than the default (1,10,2,MT,X)."))
        .inputs([
            ToolInput::new("vcf", Type::file(Vcf)).position(1),
            ToolInput::new("tempDir", Type::String.optional())
                .prefix("--temporary-directory")
                .doc("Use a directory other than /tmp for temporary files."),
            ToolInput::new("parallel", Type::Int.optional())
                .prefix("--parallel")
                .doc("Change the number of sorts run concurrently to <int>."),
        ])
        .output(ToolOutput::new("out", Type::stdout(Vcf), Selector::Stdout))
        .metadata(
            metadata()
                .dates((2019, 5, 10), (2019, 5, 10))
                .documentation("Sorts a VCF file, writing the sorted file to standard out.")
                .documentation_url("https://vcftools.github.io/perl_module.html#vcf-sort"),
        )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tool::InputValues;

    #[test]
    pub fn it_recodes_by_default() {
        let tool = versioned(vcftools(), &versions()).remove(0).unwrap();
        let values: InputValues =
            serde_json::from_value(json!({ "vcf": "calls.vcf", "chromosome": "chr20" })).unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().to_string(),
            "vcftools --vcf calls.vcf --out calls.vcftools --chr chr20 --recode --recode-INFO-all"
        );
    }

    #[test]
    pub fn it_sorts_naturally() {
        let tool = versioned(sort(), &versions()).remove(0).unwrap();
        let values: InputValues = serde_json::from_value(json!({ "vcf": "calls.vcf" })).unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().to_string(),
            "vcf-sort -c calls.vcf"
        );
    }
}
