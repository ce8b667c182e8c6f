//! Cutadapt: removing adapter sequences from reads.
//!
//! Link: https://cutadapt.readthedocs.io/en/stable/guide.html

use crate::tool::{
    CommandToolBuilder, Selector, Tool, ToolInput, ToolMetadata, ToolOutput, VersionInfo,
};
use crate::tools::{versioned, MAINTAINERS};
use crate::types::sequence::FastqGz;
use crate::types::{Filename, Type};

/// The cutadapt releases the definitions are published for.
pub fn versions() -> Vec<VersionInfo> {
    vec![
        VersionInfo::new("1.18", "quay.io/biocontainers/cutadapt:1.18--py37h14c3975_1"),
        VersionInfo::new("2.1", "quay.io/biocontainers/cutadapt:2.1--py37h14c3975_0"),
    ]
}

pub(crate) fn definitions() -> Vec<anyhow::Result<Tool>> {
    versioned(cutadapt(), &versions())
}

fn adapters(tag: &str, prefix: &str, doc: &str) -> ToolInput {
    ToolInput::new(tag, Type::String.array().optional())
        .prefix(prefix)
        .prefix_each()
        .doc(doc)
}

fn cutadapt() -> CommandToolBuilder {
    CommandToolBuilder::new("CutAdapt")
        .friendly_name("Cutadapt")
        .tool_provider("Marcel Martin")
        .base_command(["cutadapt"])
        .cpus(5)
        .memory_gb(4.0)
        .inputs([
            ToolInput::new("fastq", Type::file(FastqGz).array()).position(5),
            ToolInput::new(
                "outputFilename",
                Type::Filename(Filename::with_extension(".fastq.gz").suffix("-R1")),
            )
            .prefix("-o")
            .doc("Write trimmed reads to FILE. FASTQ or FASTA format is chosen depending on input."),
            ToolInput::new(
                "secondReadFile",
                Type::Filename(Filename::with_extension(".fastq.gz").suffix("-R2")),
            )
            .prefix("-p")
            .doc("Write second read in a pair to FILE."),
            adapters(
                "adapter",
                "-a",
                "Sequence of an adapter ligated to the 3' end (paired data: of the first read). \
                The adapter and subsequent bases are trimmed.",
            ),
            adapters(
                "front",
                "-g",
                "Sequence of an adapter ligated to the 5' end (paired data: of the first read). \
                The adapter and any preceding bases are trimmed.",
            ),
            adapters(
                "anywhere",
                "-b",
                "Sequence of an adapter that may be ligated to the 5' or 3' end (paired data: of \
                the first read). Both types of matches as described under -a and -g are allowed.",
            ),
            adapters(
                "secondAdapter",
                "-A",
                "3' adapter to be removed from second read in a pair.",
            ),
            adapters(
                "secondFront",
                "-G",
                "5' adapter to be removed from second read in a pair.",
            ),
            adapters(
                "secondAnywhere",
                "-B",
                "5'/3 adapter to be removed from second read in a pair.",
            ),
            ToolInput::new("cores", Type::Int.optional())
                .prefix("--cores")
                .doc("Number of CPU cores to use. Use 0 to auto-detect. Default: 1"),
            ToolInput::new("errorRate", Type::Float.optional())
                .prefix("--error-rate")
                .doc("Maximum allowed error rate as value between 0 and 1 (no. of errors divided by length of matching region). Default: 0.1 (=10%)"),
            ToolInput::new("noIndels", Type::Boolean.optional())
                .prefix("--no-indels")
                .doc("Allow only mismatches in alignments. Default: allow both mismatches and indels"),
            ToolInput::new("times", Type::Int.optional())
                .prefix("--times")
                .doc("Remove up to COUNT adapters from each read. Default: 1"),
            ToolInput::new("overlap", Type::Int.optional())
                .prefix("--overlap")
                .doc("Require MINLENGTH overlap between read and adapter for an adapter to be found. Default: 3"),
            ToolInput::new("matchReadWildcards", Type::Boolean.optional())
                .prefix("--match-read-wildcards")
                .doc("Interpret IUPAC wildcards in reads. Default: False"),
            ToolInput::new("cut", Type::Int.optional())
                .prefix("--cut")
                .doc("Remove bases from each read (first read only if paired). If LENGTH is positive, remove bases from the beginning. If LENGTH is negative, remove bases from the end."),
            ToolInput::new("nextseqTrim", Type::String.optional())
                .prefix("--nextseq-trim")
                .doc("NextSeq-specific quality trimming (each read). Trims also dark cycles appearing as high-quality G bases."),
            ToolInput::new("qualityCutoff", Type::Int.optional())
                .prefix("--quality-cutoff")
                .doc("Trim low-quality bases from 5' and/or 3' ends of each read before adapter removal."),
            ToolInput::new("qualityBase", Type::Int.optional())
                .prefix("--quality-base")
                .doc("Assume that quality values in FASTQ are encoded as ascii(quality + N). This needs to be set to 64 for some old Illumina FASTQ files. Default: 33"),
            ToolInput::new("length", Type::Int.optional())
                .prefix("--length")
                .doc("Shorten reads to LENGTH. Positive values remove bases at the end while negative ones remove bases at the beginning."),
            ToolInput::new("trimN", Type::Boolean.optional())
                .prefix("--trim-n")
                .doc("Trim N's on ends of reads."),
            ToolInput::new("minimumLength", Type::Int.optional())
                .prefix("--minimum-length")
                .doc("Discard reads shorter than LEN. Default: 0"),
            ToolInput::new("maximumLength", Type::Int.optional())
                .prefix("--maximum-length")
                .doc("Discard reads longer than LEN. Default: no limit"),
            ToolInput::new("maxN", Type::Int.optional())
                .prefix("--max-n")
                .doc("Discard reads with more than COUNT 'N' bases. If COUNT is a number between 0 and 1, it is interpreted as a fraction of the read length."),
            ToolInput::new("discardTrimmed", Type::Boolean.optional())
                .prefix("--discard-trimmed")
                .doc("Discard reads that contain an adapter. Also use -O to avoid discarding too many randomly matching reads!"),
            ToolInput::new("discardUntrimmed", Type::Boolean.optional())
                .prefix("--discard-untrimmed")
                .doc("Discard reads that do not contain an adapter."),
            ToolInput::new("pairFilter", Type::String.optional())
                .prefix("--pair-filter")
                .doc("Which of the reads in a paired-end read have to match the filtering criterion in order for the pair to be filtered: any, both or first. Default: any"),
            ToolInput::new("report", Type::String.optional())
                .prefix("--report")
                .doc("Which type of report to print: 'full' or 'minimal'. Default: full"),
        ])
        .output(
            ToolOutput::new(
                "out",
                Type::file(FastqGz).array(),
                Selector::Wildcard("*.fastq.gz".into()),
            )
            .doc("The trimmed reads."),
        )
        .metadata(
            ToolMetadata::new()
                .contributor(MAINTAINERS)
                .dates((2019, 3, 21), (2020, 5, 15))
                .institution("Marcel Martin")
                .doi("DOI:10.14806/ej.17.1.200")
                .citation(
                    "Martin, Marcel. \"Cutadapt removes adapter sequences from high-throughput \
                    sequencing reads.\" EMBnet.journal [Online], 17.1 (2011): pp. 10-12. Web. \
                    13 Mar. 2019.",
                )
                .keywords(["cutadapt", "adapters", "trimming"])
                .documentation(
                    "Cutadapt finds and removes adapter sequences, primers, poly-A tails and other \
                    types of unwanted sequence from your high-throughput sequencing reads. Run \
                    cutadapt --help to see all command-line options. \
                    See https://cutadapt.readthedocs.io/ for full documentation.",
                )
                .documentation_url("https://cutadapt.readthedocs.io/en/stable/guide.html"),
        )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tool::InputValues;

    #[test]
    pub fn it_repeats_the_prefix_for_every_adapter() {
        let tool = versioned(cutadapt(), &versions()).pop().unwrap().unwrap();
        let values: InputValues = serde_json::from_value(json!({
            "fastq": ["sample_R1.fastq.gz", "sample_R2.fastq.gz"],
            "outputFilename": "sample-R1.fastq.gz",
            "secondReadFile": "sample-R2.fastq.gz",
            "adapter": ["AGATCGGAAGAGC", "CTGTCTCTTATA"],
            "minimumLength": 50,
        }))
        .unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().to_string(),
            "cutadapt -o sample-R1.fastq.gz -p sample-R2.fastq.gz -a AGATCGGAAGAGC \
            -a CTGTCTCTTATA --minimum-length 50 sample_R1.fastq.gz sample_R2.fastq.gz"
        );
    }

    #[test]
    pub fn it_leaves_out_adapters_that_were_not_found() {
        let tool = versioned(cutadapt(), &versions()).pop().unwrap().unwrap();
        let values: InputValues = serde_json::from_value(json!({
            "fastq": ["sample_R1.fastq.gz"],
            "adapter": [],
        }))
        .unwrap();

        let command = tool.command_line(&values).unwrap();
        assert!(!command.tokens().iter().any(|t| t == "-a"));
    }
}
