//! BCFtools: manipulating variant calls in VCF and BCF.
//!
//! Link: https://samtools.github.io/bcftools/bcftools.html

use crate::tool::{
    CommandToolBuilder, Selector, Tool, ToolArgument, ToolInput, ToolMetadata, ToolOutput,
    VersionInfo,
};
use crate::tools::{versioned, MAINTAINERS};
use crate::types::sequence::FastaWithDict;
use crate::types::variants::{CompressedVcf, Vcf, VcfTabix};
use crate::types::{Filename, Type};

/// The BCFtools releases the definitions are published for.
pub fn versions() -> Vec<VersionInfo> {
    vec![
        VersionInfo::new("v1.5", "biocontainers/bcftools:v1.5_cv2"),
        VersionInfo::new("v1.9", "biocontainers/bcftools:v1.9-1-deb_cv1"),
    ]
}

pub(crate) fn definitions() -> Vec<anyhow::Result<Tool>> {
    let versions = versions();
    [view(), sort(), index(), norm(), annotate(), concat()]
        .into_iter()
        .flat_map(|builder| versioned(builder, &versions))
        .collect()
}

fn metadata() -> ToolMetadata {
    ToolMetadata::new()
        .contributor(MAINTAINERS)
        .institution("Samtools")
        .doi("http://www.ncbi.nlm.nih.gov/pubmed/19505943")
        .citation(
            "Li H, Handsaker B, Wysoker A, Fennell T, Ruan J, Homer N, Marth G, Abecasis G, \
            Durbin R, and 1000 Genome Project Data Processing Subgroup, The Sequence alignment/map \
            (SAM) format and SAMtools, Bioinformatics (2009) 25(16) 2078-9",
        )
        .keywords(["bcftools"])
}

fn compressed_output(extension: &str, prefix: &str) -> ToolInput {
    ToolInput::new(
        "outputFilename",
        Type::Filename(Filename::with_extension(extension).prefix(prefix)),
    )
    .prefix("--output")
    .doc("Output file name [stdout].")
}

fn output_type() -> ToolInput {
    ToolInput::new("outputType", Type::String.optional())
        .prefix("--output-type")
        .default("z")
        .doc(
            "Output compressed BCF (b), uncompressed BCF (u), compressed VCF (z), uncompressed \
            VCF (v). Use the -Ou option when piping between bcftools subcommands to speed up \
            performance by removing unnecessary compression/decompression and VCF<->BCF \
            conversion.",
        )
}

fn threads() -> ToolInput {
    ToolInput::new("threads", Type::Int.optional())
        .prefix("--threads")
        .doc("Number of output compression threads to use in addition to main thread. Only used when --output-type is b or z. Default: 0.")
}

fn regions() -> ToolInput {
    ToolInput::new("regions", Type::String.array().optional())
        .prefix("--regions")
        .separator(",")
        .doc("Comma-separated list of regions, see also -R, --regions-file.")
}

fn view() -> CommandToolBuilder {
    CommandToolBuilder::new("BcfToolsView")
        .friendly_name("BCFTools: View")
        .tool_provider("BCFTools")
        .base_command(["bcftools", "view"])
        .inputs([
            ToolInput::new("vcf", Type::file(CompressedVcf)).position(2),
            compressed_output(".vcf.gz", "vcf").position(1),
            output_type().position(1),
            ToolInput::new("dropGenotypes", Type::Boolean.optional())
                .prefix("--drop-genotypes")
                .position(1)
                .doc("Drop individual genotype information (after subsetting if -s option set)."),
            ToolInput::new("headerOnly", Type::Boolean.optional())
                .prefix("--header-only")
                .position(1)
                .doc("Print the header only in VCF output."),
            ToolInput::new("noHeader", Type::Boolean.optional())
                .prefix("--no-header")
                .position(1)
                .doc("Suppress the header in VCF output."),
            ToolInput::new("compressionLevel", Type::Int.optional())
                .prefix("--compression-level")
                .position(1)
                .doc("Compression level: 0 uncompressed, 1 best speed, 9 best compression [-1]."),
            regions().position(1),
            ToolInput::new("targets", Type::String.array().optional())
                .prefix("--targets")
                .separator(",")
                .position(1)
                .doc("Similar as -r, --regions, but the next position is accessed by streaming the whole VCF/BCF."),
            ToolInput::new("samples", Type::String.array().optional())
                .prefix("--samples")
                .separator(",")
                .position(1)
                .doc("Comma-separated list of samples to include or exclude if prefixed with \"^\"."),
            ToolInput::new("applyFilters", Type::String.array().optional())
                .prefix("--apply-filters")
                .separator(",")
                .position(1)
                .doc("Skip sites where FILTER column does not contain any of the strings listed in LIST."),
            ToolInput::new("include", Type::String.optional())
                .prefix("--include")
                .position(1)
                .doc("Include only sites for which EXPRESSION is true."),
            ToolInput::new("exclude", Type::String.optional())
                .prefix("--exclude")
                .position(1)
                .doc("Exclude sites for which EXPRESSION is true."),
            ToolInput::new("minAlleles", Type::Int.optional())
                .prefix("--min-alleles")
                .position(1)
                .doc("Print sites with at least INT alleles listed in REF and ALT columns."),
            ToolInput::new("maxAlleles", Type::Int.optional())
                .prefix("--max-alleles")
                .position(1)
                .doc("Print sites with at most INT alleles listed in REF and ALT columns."),
            ToolInput::new("types", Type::String.array().optional())
                .prefix("--types")
                .separator(",")
                .position(1)
                .doc("Comma-separated list of variant types to select. Site is selected if any of the ALT alleles is of the type requested."),
            ToolInput::new("excludeTypes", Type::String.array().optional())
                .prefix("--exclude-types")
                .separator(",")
                .position(1)
                .doc("Comma-separated list of variant types to exclude."),
            threads().position(1),
        ])
        .output(ToolOutput::new(
            "out",
            Type::file(CompressedVcf),
            Selector::Input("outputFilename".into()),
        ))
        .metadata(
            metadata()
                .dates((2019, 1, 24), (2019, 1, 24))
                .documentation(
                    "View, subset and filter VCF or BCF files by position and filtering \
                    expression. Convert between VCF and BCF.",
                )
                .documentation_url("https://samtools.github.io/bcftools/bcftools.html#view"),
        )
}

fn sort() -> CommandToolBuilder {
    CommandToolBuilder::new("BcfToolsSort")
        .friendly_name("BCFTools: Sort")
        .tool_provider("BCFTools")
        .base_command(["bcftools", "sort"])
        .inputs([
            ToolInput::new("vcf", Type::file(Vcf)).position(1),
            compressed_output(".vcf.gz", "vcf"),
            output_type(),
            ToolInput::new("tempDir", Type::String.optional())
                .prefix("--temp-dir")
                .doc("Use this directory to store temporary files."),
            ToolInput::new("maxMem", Type::String.optional())
                .prefix("--max-mem")
                .doc("Maximum memory to use. Approximate, affects the number of temporary files written to the disk."),
        ])
        .output(ToolOutput::new(
            "out",
            Type::file(CompressedVcf),
            Selector::Input("outputFilename".into()),
        ))
        .metadata(
            metadata()
                .dates((2019, 5, 9), (2019, 7, 11))
                .documentation("Sort VCF/BCF file.")
                .documentation_url("https://samtools.github.io/bcftools/bcftools.html#sort"),
        )
}

fn index() -> CommandToolBuilder {
    CommandToolBuilder::new("BcfToolsIndex")
        .friendly_name("BCFTools: Index")
        .tool_provider("BCFTools")
        .base_command(["bcftools", "index"])
        .inputs([
            ToolInput::new("vcf", Type::file(CompressedVcf)).position(1),
            ToolInput::new("csi", Type::Boolean.optional())
                .prefix("--csi")
                .doc("Generate CSI-format index for VCF/BCF files [default]."),
            ToolInput::new("force", Type::Boolean.optional())
                .prefix("--force")
                .doc("Overwrite index if it already exists."),
            ToolInput::new("minShift", Type::Int.optional())
                .prefix("--min-shift")
                .doc("Set minimal interval size for CSI indices to 2^INT; default: 14."),
            ToolInput::new("tbi", Type::Boolean.optional())
                .prefix("--tbi")
                .default(true)
                .doc("Generate TBI-format index for VCF files."),
            ToolInput::new("nrecords", Type::Boolean.optional())
                .prefix("--nrecords")
                .doc("Print the number of records based on the CSI or TBI index files."),
            ToolInput::new("stats", Type::Boolean.optional())
                .prefix("--stats")
                .doc("Print per contig stats based on the CSI or TBI index files."),
            threads(),
        ])
        .output(ToolOutput::new(
            "out",
            Type::file(VcfTabix),
            Selector::Input("vcf".into()),
        ))
        .metadata(
            metadata()
                .dates((2019, 1, 24), (2019, 1, 24))
                .documentation("Creates index for bgzip compressed VCF/BCF files for random access.")
                .documentation_url("https://samtools.github.io/bcftools/bcftools.html#index"),
        )
}

fn norm() -> CommandToolBuilder {
    CommandToolBuilder::new("BcfToolsNorm")
        .friendly_name("BCFTools: Normalize")
        .tool_provider("BCFTools")
        .base_command(["bcftools", "norm"])
        .inputs([
            ToolInput::new("vcf", Type::file(Vcf)).position(10),
            compressed_output(".norm.vcf.gz", "vcf"),
            output_type(),
            ToolInput::new("reference", Type::file(FastaWithDict).optional())
                .prefix("--fasta-ref")
                .doc("Reference sequence. Supplying this option will turn on left-alignment and normalization."),
            ToolInput::new("checkRef", Type::String.optional())
                .prefix("--check-ref")
                .doc("What to do when incorrect or missing REF allele is encountered: exit (e), warn (w), exclude (x), or set/fix (s) bad sites."),
            ToolInput::new("removeDuplicates", Type::Boolean.optional())
                .prefix("--rm-dup")
                .doc("If a record is present in multiple files, output only the first instance."),
            ToolInput::new("multiallelics", Type::String.optional())
                .prefix("--multiallelics")
                .doc("Split multiallelic sites into biallelic records (-) or join biallelic sites into multiallelic records (+)."),
            ToolInput::new("noVersion", Type::Boolean.optional())
                .prefix("--no-version")
                .doc("Do not append version and command line information to the output VCF header."),
            regions(),
            threads(),
        ])
        .output(ToolOutput::new(
            "out",
            Type::file(CompressedVcf),
            Selector::Input("outputFilename".into()),
        ))
        .metadata(
            metadata()
                .dates((2019, 1, 24), (2019, 1, 24))
                .documentation(
                    "Left-align and normalize indels, check if REF alleles match the reference, \
                    split multiallelic sites into multiple rows; recover multiallelics from \
                    multiple rows. Left-alignment and normalization will only be applied if the \
                    --fasta-ref option is supplied.",
                )
                .documentation_url("https://samtools.github.io/bcftools/bcftools.html#norm"),
        )
}

fn annotate() -> CommandToolBuilder {
    CommandToolBuilder::new("BcfToolsAnnotate")
        .friendly_name("BCFTools: Annotate")
        .tool_provider("BCFTools")
        .base_command(["bcftools", "annotate"])
        .inputs([
            ToolInput::new("vcf", Type::file(Vcf)).position(10),
            compressed_output(".annotated.vcf.gz", "vcf"),
            output_type(),
            ToolInput::new("annotations", Type::file(VcfTabix).optional())
                .prefix("--annotations")
                .doc("Bgzip-compressed and tabix-indexed file with annotations."),
            ToolInput::new("columns", Type::String.array().optional())
                .prefix("--columns")
                .separator(",")
                .doc("Comma-separated list of columns or tags to carry over from the annotation file."),
            ToolInput::new("exclude", Type::String.optional())
                .prefix("--exclude")
                .doc("Exclude sites for which EXPRESSION is true."),
            ToolInput::new("headerLines", Type::String.optional())
                .prefix("--header-lines")
                .doc("Lines to append to the VCF header."),
            ToolInput::new("setId", Type::String.optional())
                .prefix("--set-id")
                .doc("Assign ID on the fly. The format is the same as in the query command."),
            ToolInput::new("include", Type::String.optional())
                .prefix("--include")
                .doc("Include only sites for which EXPRESSION is true."),
            ToolInput::new("keepSites", Type::Boolean.optional())
                .prefix("--keep-sites")
                .doc("Keep sites which do not pass -i and -e expressions instead of discarding them."),
            ToolInput::new("removeAnnotations", Type::String.array().optional())
                .prefix("--remove")
                .separator(",")
                .doc("List of annotations to remove."),
            regions(),
            ToolInput::new("samples", Type::String.array().optional())
                .prefix("--samples")
                .separator(",")
                .doc("Subset of samples to annotate."),
            threads(),
        ])
        .output(ToolOutput::new(
            "out",
            Type::file(CompressedVcf),
            Selector::Input("outputFilename".into()),
        ))
        .metadata(
            metadata()
                .dates((2019, 1, 24), (2019, 1, 24))
                .documentation(
                    "Add or remove annotations. The columns to transfer are given with \
                    --columns, and removed with --remove.",
                )
                .documentation_url("https://samtools.github.io/bcftools/bcftools.html#annotate"),
        )
}

fn concat() -> CommandToolBuilder {
    CommandToolBuilder::new("BcfToolsConcat")
        .friendly_name("BCFTools: Concat")
        .tool_provider("BCFTools")
        .base_command(["bcftools", "concat"])
        .argument(ToolArgument::new("z").prefix("-O"))
        .inputs([
            ToolInput::new("vcf", Type::file(VcfTabix).array()).position(15),
            ToolInput::new(
                "outputFilename",
                Type::Filename(Filename::with_extension(".vcf.gz").suffix("-concat")),
            )
            .prefix("-o")
            .doc("Write output to a file [standard output]."),
            ToolInput::new("allowOverLaps", Type::Boolean.optional())
                .prefix("-a")
                .doc("First coordinate of the next file can precede last record of the current file."),
            ToolInput::new("compactPS", Type::Boolean.optional())
                .prefix("-c")
                .doc("Do not output PS tag at each site, only at the start of a new phase set block."),
            ToolInput::new("rmDups", Type::String.optional())
                .prefix("-d")
                .doc("Output duplicate records present in multiple files only once: <snps|indels|both|all|none>."),
            ToolInput::new("ligate", Type::Boolean.optional())
                .prefix("-l")
                .doc("Ligate phased VCFs by matching phase at overlapping haplotypes."),
            ToolInput::new("naive", Type::Boolean.optional())
                .prefix("-n")
                .doc("Concatenate files without recompression (dangerous, use with caution)."),
            ToolInput::new("minPG", Type::Int.optional())
                .prefix("-q")
                .doc("Break phase set if phasing quality is lower than <int> [30]."),
            regions(),
            threads(),
        ])
        .output(ToolOutput::new(
            "out",
            Type::file(CompressedVcf),
            Selector::Input("outputFilename".into()),
        ))
        .metadata(
            metadata()
                .dates((2019, 1, 24), (2019, 1, 24))
                .documentation(
                    "Concatenate or combine VCF/BCF files. All source files must have the same \
                    sample columns appearing in the same order. Can be used, for example, to \
                    concatenate chromosome VCFs into one VCF, or combine a SNP VCF and an indel \
                    VCF into one. The input files must be sorted by chr and position.",
                )
                .documentation_url("https://samtools.github.io/bcftools/bcftools.html#concat"),
        )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tool::InputValues;

    fn latest(builder: CommandToolBuilder) -> Tool {
        versioned(builder, &versions()).pop().unwrap().unwrap()
    }

    #[test]
    pub fn it_renders_an_indexing_command_with_the_tbi_default() {
        let tool = latest(index());
        let values: InputValues =
            serde_json::from_value(json!({ "vcf": "calls.vcf.gz" })).unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().to_string(),
            "bcftools index --tbi calls.vcf.gz"
        );
    }

    #[test]
    pub fn it_renders_concatenated_inputs_last() {
        let tool = latest(concat());
        let values: InputValues = serde_json::from_value(json!({
            "vcf": ["chr1.vcf.gz", "chr2.vcf.gz"],
            "allowOverLaps": true,
        }))
        .unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().to_string(),
            "bcftools concat -O z -o generated-concat.vcf.gz -a chr1.vcf.gz chr2.vcf.gz"
        );
    }

    #[test]
    pub fn it_joins_region_lists_with_commas() {
        let tool = latest(view());
        let values: InputValues = serde_json::from_value(json!({
            "vcf": "in.vcf.gz",
            "regions": ["chr1", "chr2:100-200"],
        }))
        .unwrap();

        let command = tool.command_line(&values).unwrap();
        assert!(command
            .tokens()
            .windows(2)
            .any(|w| w == ["--regions", "chr1,chr2:100-200"]));
    }
}
