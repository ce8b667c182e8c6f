//! Trimmomatic: trimming Illumina reads.
//!
//! Link: http://www.usadellab.org/cms/?page=trimmomatic

use crate::tool::{
    CommandToolBuilder, Selector, Tool, ToolInput, ToolMetadata, ToolOutput, VersionInfo,
};
use crate::tools::{versioned, MAINTAINERS};
use crate::types::reports::TextFile;
use crate::types::sequence::FastqGz;
use crate::types::{Filename, Type};

/// The Trimmomatic releases the definitions are published for.
pub fn versions() -> Vec<VersionInfo> {
    vec![
        VersionInfo::new("0.35", "biocontainers/trimmomatic:v0.35dfsg-1-deb_cv1"),
        VersionInfo::new("0.39", "quay.io/biocontainers/trimmomatic:0.39--1"),
    ]
}

pub(crate) fn definitions() -> Vec<anyhow::Result<Tool>> {
    versioned(paired_end(), &versions())
}

fn trimmed(tag: &str, read: &str, suffix: &str, position: i32) -> ToolInput {
    ToolInput::new(
        tag,
        Type::Filename(
            Filename::with_extension(".fastq.gz")
                .prefix(read)
                .suffix(suffix),
        ),
    )
    .position(position)
}

/// A trimming step, e.g. `SLIDINGWINDOW:4:15`.
fn step(tag: &str, name: &str, input_type: Type, position: i32, doc: &str) -> ToolInput {
    ToolInput::new(tag, input_type.optional())
        .prefix(format!("{}:", name))
        .joined()
        .position(position)
        .doc(doc)
}

fn paired_end() -> CommandToolBuilder {
    CommandToolBuilder::new("TrimmomaticPairedEnd")
        .friendly_name("Trimmomatic: Paired End (PE)")
        .tool_provider("usadellab.org")
        .base_command(["trimmomatic", "PE"])
        .cpus(4)
        .memory_gb(8.0)
        .inputs([
            ToolInput::new("threads", Type::Int.optional())
                .prefix("-threads")
                .position(1)
                .doc("Specifies the number of threads to use."),
            ToolInput::new("phred", Type::Int.optional())
                .prefix("-phred")
                .joined()
                .position(1)
                .default(33)
                .doc("The quality encoding, 33 or 64. If unset, it is determined from the input."),
            ToolInput::new("trimLogFilename", Type::String.optional())
                .prefix("-trimlog")
                .position(1)
                .doc("Specifying a trimlog file creates a log of all read trimmings."),
            ToolInput::new("inputRead1", Type::file(FastqGz)).position(2),
            ToolInput::new("inputRead2", Type::file(FastqGz)).position(3),
            trimmed("outputFilenameR1", "inputRead1", ".trimmed", 4),
            trimmed("outputFilenameR1Unpaired", "inputRead1", ".unpaired", 5),
            trimmed("outputFilenameR2", "inputRead2", ".trimmed", 6),
            trimmed("outputFilenameR2Unpaired", "inputRead2", ".unpaired", 7),
            step(
                "illuminaClip",
                "ILLUMINACLIP",
                Type::String,
                10,
                "<fastaWithAdapters>:<seed mismatches>:<palindrome clip threshold>:<simple clip threshold>. \
                Cut adapter and other illumina-specific sequences from the read.",
            ),
            step(
                "slidingWindow",
                "SLIDINGWINDOW",
                Type::String,
                11,
                "<windowSize>:<requiredQuality>. Performs a sliding window trimming approach, \
                cutting once the average quality within the window falls below a threshold.",
            ),
            step(
                "maxInfo",
                "MAXINFO",
                Type::String,
                12,
                "<targetLength>:<strictness>. An adaptive quality trimmer which balances read \
                length and error rate to maximise the value of each read.",
            ),
            step(
                "leading",
                "LEADING",
                Type::Int,
                13,
                "Cut bases off the start of a read, if below a threshold quality.",
            ),
            step(
                "trailing",
                "TRAILING",
                Type::Int,
                14,
                "Cut bases off the end of a read, if below a threshold quality.",
            ),
            step(
                "crop",
                "CROP",
                Type::Int,
                15,
                "Cut the read to a specified length by removing bases from the end.",
            ),
            step(
                "headcrop",
                "HEADCROP",
                Type::Int,
                16,
                "Cut the specified number of bases from the start of the read.",
            ),
            step(
                "minlen",
                "MINLEN",
                Type::Int,
                17,
                "Drop the read if it is below a specified length.",
            ),
            step(
                "avgqual",
                "AVGQUAL",
                Type::Int,
                18,
                "Drop the read if the average quality is below the specified level.",
            ),
        ])
        .outputs([
            ToolOutput::new(
                "pairedOutR1",
                Type::file(FastqGz),
                Selector::Input("outputFilenameR1".into()),
            ),
            ToolOutput::new(
                "unpairedOutR1",
                Type::file(FastqGz),
                Selector::Input("outputFilenameR1Unpaired".into()),
            ),
            ToolOutput::new(
                "pairedOutR2",
                Type::file(FastqGz),
                Selector::Input("outputFilenameR2".into()),
            ),
            ToolOutput::new(
                "unpairedOutR2",
                Type::file(FastqGz),
                Selector::Input("outputFilenameR2Unpaired".into()),
            ),
            ToolOutput::new(
                "trimLog",
                Type::file(TextFile).optional(),
                Selector::Input("trimLogFilename".into()),
            ),
        ])
        .metadata(
            ToolMetadata::new()
                .contributor(MAINTAINERS)
                .dates((2020, 5, 11), (2020, 5, 11))
                .institution("Usadel Lab")
                .doi("10.1093/bioinformatics/btu170")
                .citation(
                    "Bolger, A. M., Lohse, M., & Usadel, B. (2014). Trimmomatic: A flexible trimmer \
                    for Illumina Sequence Data. Bioinformatics, btu170.",
                )
                .keywords(["trimmomatic", "trimming", "illumina"])
                .documentation(
                    "Trimmomatic is a fast, multithreaded command line tool that can be used to \
                    trim and crop Illumina (FASTQ) data as well as to remove adapters. \
                    The paired end mode will maintain correspondence of read pairs and also use \
                    the additional information contained in paired reads to better find adapter \
                    or PCR primer fragments introduced by the library preparation process.\n\n\
                    The processing steps are applied in the order ILLUMINACLIP, SLIDINGWINDOW, \
                    MAXINFO, LEADING, TRAILING, CROP, HEADCROP, MINLEN, AVGQUAL.",
                )
                .documentation_url("http://www.usadellab.org/cms/?page=trimmomatic"),
        )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tool::InputValues;

    #[test]
    pub fn it_joins_trimming_steps_to_their_names() {
        let tool = versioned(paired_end(), &versions()).pop().unwrap().unwrap();
        let values: InputValues = serde_json::from_value(json!({
            "inputRead1": "sample_R1.fastq.gz",
            "inputRead2": "sample_R2.fastq.gz",
            "slidingWindow": "4:15",
            "minlen": 36,
        }))
        .unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().to_string(),
            "trimmomatic PE -phred33 sample_R1.fastq.gz sample_R2.fastq.gz \
            sample_R1.trimmed.fastq.gz sample_R1.unpaired.fastq.gz \
            sample_R2.trimmed.fastq.gz sample_R2.unpaired.fastq.gz \
            SLIDINGWINDOW:4:15 MINLEN:36"
        );
    }
}
