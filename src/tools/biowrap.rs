//! Transforms implemented in `biowrap` itself, wrapped as code tools.
//!
//! In a container, each tool is invoked through the `biowrap` binary; the base
//! command and flags here must stay in step with the subcommands in
//! [`crate::commands`].

use std::path::Path;

use anyhow::bail;
use serde_json::json;
use serde_json::Value;

use crate::tool::{
    CodeFn, CodeTool, CommandToolBuilder, InputValues, Selector, Tool, ToolInput, ToolMetadata,
    ToolOutput, VersionInfo,
};
use crate::tools::MAINTAINERS;
use crate::transforms::fastqc::parse_fastqc_adapters;
use crate::transforms::intervals::{write_intervals, IntervalOptions};
use crate::types::annotation::Bed;
use crate::types::reports::TextFile;
use crate::types::sequence::FastaWithDict;
use crate::types::Type;

/// The version of `biowrap` the code tools are published for.
pub fn versions() -> Vec<VersionInfo> {
    let version = env!("CARGO_PKG_VERSION");
    vec![VersionInfo::new(version, format!("biowrap:{}", version))]
}

pub(crate) fn definitions() -> Vec<anyhow::Result<Tool>> {
    let versions = versions();
    let tools: [(CommandToolBuilder, CodeFn); 2] = [
        (generate_intervals_by_chromosome(), run_generate_intervals),
        (parse_fastqc_adaptors(), run_parse_fastqc_adaptors),
    ];

    tools
        .into_iter()
        .flat_map(|(builder, run)| {
            versions.iter().map(move |version| {
                builder
                    .clone()
                    .version(version.clone())
                    .build()
                    .map(|command| Tool::Code(CodeTool::new(command, run)))
            })
        })
        .collect()
}

//=========//
// Helpers //
//=========//

fn optional_str<'a>(values: &'a InputValues, tag: &str) -> anyhow::Result<Option<&'a str>> {
    match values.get(tag) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => bail!("input {} must be a string, got {}", tag, other),
    }
}

fn required_str<'a>(values: &'a InputValues, tag: &str) -> anyhow::Result<&'a str> {
    match optional_str(values, tag)? {
        Some(s) => Ok(s),
        None => bail!("missing required input: {}", tag),
    }
}

fn optional_count(values: &InputValues, tag: &str) -> anyhow::Result<Option<u64>> {
    match values.get(tag) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => match value.as_u64() {
            Some(n) => Ok(Some(n)),
            None => bail!("input {} must be a non-negative integer, got {}", tag, value),
        },
    }
}

fn metadata() -> ToolMetadata {
    ToolMetadata::new()
        .contributor(MAINTAINERS)
        .institution("biowrap")
        .keywords(["biowrap", "transform"])
}

//=====================//
// Interval generation //
//=====================//

fn generate_intervals_by_chromosome() -> CommandToolBuilder {
    CommandToolBuilder::new("GenerateIntervalsByChromosome")
        .friendly_name("Generate genome for BedtoolsCoverage")
        .tool_provider("biowrap")
        .base_command(["biowrap", "intervals"])
        .cpus(1)
        .memory_gb(1.0)
        .inputs([
            ToolInput::new("reference", Type::file(FastaWithDict))
                .position(1)
                .doc("The reference; its .dict sequence dictionary lists the contigs."),
            ToolInput::new("prefix", Type::String.optional())
                .prefix("--prefix")
                .position(2)
                .default("chromosome_")
                .doc("Prepended to the name of every BED file."),
            ToolInput::new("allowedContigs", Type::String.array().optional())
                .prefix("--contig")
                .prefix_each()
                .position(2)
                .doc("Only generate intervals for these contigs. All contigs when unset."),
            ToolInput::new("maxSize", Type::Int.optional())
                .prefix("--max-size")
                .position(2)
                .doc("Split contigs longer than this into chunks of at most this many bases."),
            ToolInput::new("overlap", Type::Int.optional())
                .prefix("--overlap")
                .position(2)
                .doc("How many bases consecutive chunks share. Requires maxSize."),
            ToolInput::new("singleFile", Type::Boolean.optional())
                .prefix("--single-file")
                .position(2)
                .doc("Write every interval to a single {prefix}intervals.bed."),
            ToolInput::new("outputDirectory", Type::String.optional())
                .prefix("--output-directory")
                .position(2)
                .default(".")
                .doc("Where to write the BED files."),
        ])
        .output(
            ToolOutput::new(
                "out",
                Type::file(Bed).array(),
                Selector::Wildcard("*.bed".into()),
            )
            .doc("One BED file per contig, or a single file when singleFile is set."),
        )
        .metadata(
            metadata()
                .dates((2019, 9, 24), (2020, 2, 14))
                .documentation(
                    "Generate a BED file per contig of the reference, so that work can be \
                    scattered by contig. Contigs are read from the reference's sequence \
                    dictionary (.dict). Each line of the output is \
                    contig<TAB>start<TAB>end<TAB>label, covering the whole contig, or, when \
                    maxSize is set, overlapping chunks labelled {contig}_{n}.",
                ),
        )
}

fn run_generate_intervals(values: &InputValues) -> anyhow::Result<Value> {
    let reference = required_str(values, "reference")?;
    let prefix = optional_str(values, "prefix")?.unwrap_or("");
    let directory = optional_str(values, "outputDirectory")?.unwrap_or(".");

    let allowed_contigs = match values.get("allowedContigs") {
        Some(Value::Array(contigs)) => contigs
            .iter()
            .map(|c| match c.as_str() {
                Some(c) => Ok(c.to_string()),
                None => bail!("input allowedContigs must hold strings, got {}", c),
            })
            .collect::<anyhow::Result<Vec<_>>>()?,
        _ => Vec::new(),
    };

    let options = IntervalOptions {
        allowed_contigs,
        max_size: optional_count(values, "maxSize")?,
        overlap: optional_count(values, "overlap")?.unwrap_or(0),
    };

    let single_file = values
        .get("singleFile")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let written = write_intervals(
        Path::new(reference),
        Path::new(directory),
        prefix,
        &options,
        single_file,
    )?;

    let written = written
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>();

    Ok(json!({ "out": written }))
}

//==================//
// FastQC adaptors //
//==================//

fn parse_fastqc_adaptors() -> CommandToolBuilder {
    CommandToolBuilder::new("ParseFastqcAdaptors")
        .friendly_name("Parse FastQC Adaptors")
        .tool_provider("biowrap")
        .base_command(["biowrap", "adapters"])
        .cpus(1)
        .memory_gb(1.0)
        .inputs([
            ToolInput::new("fastqcDatafile", Type::file(TextFile))
                .position(1)
                .doc("The fastqc_data.txt of a FastQC report."),
            ToolInput::new("cutadaptAdaptersLookup", Type::file(TextFile).optional())
                .prefix("--lookup")
                .position(2)
                .doc(
                    "Specifies a file which contains a list of sequences to lookup. The file must \
                    contain sets of named adapters in the form: name[tab]sequence. Lines prefixed \
                    with a hash will be ignored.",
                ),
        ])
        .output(
            ToolOutput::new("adaptorSequences", Type::String.array(), Selector::Stdout)
                .doc("The sequences of the adapters FastQC reported, printed as JSON."),
        )
        .metadata(
            metadata()
                .dates((2020, 1, 7), (2020, 2, 14))
                .documentation(
                    "Parse the overrepresented sequences of a FastQC report, and return the \
                    sequences of the adapters they were attributed to, as listed in the lookup. \
                    Without a lookup, no adapters are returned. The result is meant to be handed \
                    to cutadapt.",
                ),
        )
}

fn run_parse_fastqc_adaptors(values: &InputValues) -> anyhow::Result<Value> {
    let data = required_str(values, "fastqcDatafile")?;
    let lookup = optional_str(values, "cutadaptAdaptersLookup")?;

    let adapters = parse_fastqc_adapters(Path::new(data), lookup.map(Path::new))?;
    Ok(json!({ "adaptorSequences": adapters }))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn code_tools() -> Vec<CodeTool> {
        definitions()
            .into_iter()
            .map(|t| match t.unwrap() {
                Tool::Code(tool) => tool,
                other => panic!("expected a code tool, got {}", other.kind()),
            })
            .collect()
    }

    #[test]
    pub fn it_previews_the_biowrap_invocation() {
        let tool = &code_tools()[0];
        let values: InputValues = serde_json::from_value(json!({
            "reference": "hg38.fasta",
            "allowedContigs": ["chr1", "chr2"],
            "maxSize": 1000,
        }))
        .unwrap();

        assert_eq!(
            tool.command().command_line(&values).unwrap().to_string(),
            "biowrap intervals hg38.fasta --prefix chromosome_ --contig chr1 --contig chr2 \
            --max-size 1000 --output-directory ."
        );
    }

    #[test]
    pub fn it_generates_intervals_in_process() {
        let directory = tempfile::tempdir().unwrap();
        let dict = directory.path().join("ref.dict");
        fs::write(
            &dict,
            "@HD\tVN:1.6\n@SQ\tSN:chr1\tLN:2500\n@SQ\tSN:chr2\tLN:800\n",
        )
        .unwrap();

        let values: InputValues = serde_json::from_value(json!({
            "reference": dict.display().to_string(),
            "maxSize": 1000,
            "overlap": 100,
            "outputDirectory": directory.path().display().to_string(),
        }))
        .unwrap();

        let result = code_tools()[0].run(&values).unwrap();
        let written = result["out"].as_array().unwrap();
        assert_eq!(written.len(), 2);

        let chr1 = fs::read_to_string(directory.path().join("chromosome_chr1.bed")).unwrap();
        assert_eq!(
            chr1,
            "chr1\t1\t1000\tchr1_0\nchr1\t901\t1900\tchr1_1\nchr1\t1801\t2500\tchr1_2\n"
        );
    }

    #[test]
    pub fn it_rejects_a_negative_max_size() {
        let values: InputValues =
            serde_json::from_value(json!({ "reference": "ref.dict", "maxSize": -5 })).unwrap();
        assert!(code_tools()[0].run(&values).is_err());
    }

    #[test]
    pub fn it_returns_no_adapters_without_a_lookup() {
        let directory = tempfile::tempdir().unwrap();
        let data = directory.path().join("fastqc_data.txt");
        fs::write(&data, ">>Overrepresented sequences\tpass\n>>END_MODULE\n").unwrap();

        let values: InputValues = serde_json::from_value(json!({
            "fastqcDatafile": data.display().to_string(),
        }))
        .unwrap();

        let result = code_tools()[1].run(&values).unwrap();
        assert_eq!(result, json!({ "adaptorSequences": [] }));
    }
}
