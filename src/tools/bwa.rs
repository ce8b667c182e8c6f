//! BWA: the Burrows-Wheeler Aligner.
//!
//! Link: http://bio-bwa.sourceforge.net/bwa.shtml

use crate::tool::{
    CommandToolBuilder, Selector, Tool, ToolInput, ToolMetadata, ToolOutput, VersionInfo,
};
use crate::tools::{versioned, MAINTAINERS};
use crate::types::alignment::Sam;
use crate::types::sequence::{Fasta, FastaBwa, FastqGz};
use crate::types::Type;

/// The BWA releases the definitions are published for.
pub fn versions() -> Vec<VersionInfo> {
    vec![VersionInfo::new("v0.7.17", "biocontainers/bwa:v0.7.17_cv1")]
}

pub(crate) fn definitions() -> Vec<anyhow::Result<Tool>> {
    let versions = versions();
    [mem(), index()]
        .into_iter()
        .flat_map(|builder| versioned(builder, &versions))
        .collect()
}

fn metadata() -> ToolMetadata {
    ToolMetadata::new()
        .contributor(MAINTAINERS)
        .doi("arXiv:1303.3997v2")
        .citation(
            "Li H. (2013) Aligning sequence reads, clone sequences and assembly contigs with \
            BWA-MEM. arXiv:1303.3997v2 [q-bio.GN].",
        )
        .keywords(["bwa", "alignment"])
}

fn mem() -> CommandToolBuilder {
    CommandToolBuilder::new("BwaMemLatest")
        .friendly_name("BWA-MEM")
        .tool_provider("BWA")
        .base_command(["bwa", "mem"])
        .cpus(16)
        .memory_gb(16.0)
        .inputs([
            ToolInput::new("reference", Type::file(FastaBwa)).position(9),
            ToolInput::new("reads", Type::file(FastqGz).array()).position(10),
            ToolInput::new("mates", Type::file(FastqGz).array().optional())
                .position(11)
                .doc("The second file of a pair of reads, when the pair is not interleaved."),
            ToolInput::new("threads", Type::Int.optional())
                .prefix("-t")
                .doc("Number of threads. (default = 1)"),
            ToolInput::new("minimumSeedLength", Type::Int.optional())
                .prefix("-k")
                .doc("Matches shorter than INT will be missed. The alignment speed is usually insensitive to this value unless it significantly deviates from 20. (Default: 19)"),
            ToolInput::new("bandwidth", Type::Int.optional())
                .prefix("-w")
                .doc("Essentially, gaps longer than ${bandWidth} will not be found. (Default: 100)"),
            ToolInput::new("offDiagonalXDropoff", Type::Int.optional())
                .prefix("-d")
                .doc("(Z-dropoff): Stop extension when the difference between the best and the current extension score is above |i-j|*A+INT. (Default: 100)"),
            ToolInput::new("reseedTrigger", Type::Float.optional())
                .prefix("-r")
                .doc("Trigger re-seeding for a MEM longer than minSeedLen*FLOAT. (Default: 1.5)"),
            ToolInput::new("occurenceDiscard", Type::Int.optional())
                .prefix("-c")
                .doc("Discard a MEM if it has more than INT occurence in the genome. (Default: 10000)"),
            ToolInput::new("performSW", Type::Boolean.optional())
                .prefix("-P")
                .doc("In the paired-end mode, perform SW to rescue missing hits only but do not try to find hits that fit a proper pair."),
            ToolInput::new("matchingScore", Type::Int.optional())
                .prefix("-A")
                .doc("Matching score. (Default: 1)"),
            ToolInput::new("mismatchPenalty", Type::Int.optional())
                .prefix("-B")
                .doc("Mismatch penalty. The sequence error rate is approximately: {.75 * exp[-log(4) * B/A]}. (Default: 4)"),
            ToolInput::new("openGapPenalty", Type::Int.optional())
                .prefix("-O")
                .doc("Gap open penalty. (Default: 6)"),
            ToolInput::new("gapExtensionPenalty", Type::Int.optional())
                .prefix("-E")
                .doc("Gap extension penalty. A gap of length k costs O + k*E. (Default: 1)"),
            ToolInput::new("clippingPenalty", Type::Int.optional())
                .prefix("-L")
                .doc("Clipping penalty. (Default: 5)"),
            ToolInput::new("unpairedReadPenalty", Type::Int.optional())
                .prefix("-U")
                .doc("Penalty for an unpaired read pair. (Default: 9)"),
            ToolInput::new("assumeInterleavedFirstInput", Type::Boolean.optional())
                .prefix("-p")
                .doc("Assume the first input query file is interleaved paired-end FASTA/Q."),
            ToolInput::new("readGroupHeaderLine", Type::String.optional())
                .prefix("-R")
                .doc("Complete read group header line. '\\t' can be used in STR and will be converted to a TAB in the output SAM. The read group ID will be attached to every read in the output. An example is '@RG\\tID:foo\\tSM:bar'."),
            ToolInput::new("outputAlignmentThreshold", Type::Int.optional())
                .prefix("-T")
                .doc("Don't output alignment with score lower than INT. Only affects output. (Default: 30)"),
            ToolInput::new("outputAllElements", Type::Boolean.optional())
                .prefix("-a")
                .doc("Output all found alignments for single-end or unpaired paired-end reads."),
            ToolInput::new("appendComments", Type::Boolean.optional())
                .prefix("-C")
                .doc("Append FASTA/Q comment to SAM output."),
            ToolInput::new("hardClipping", Type::Boolean.optional())
                .prefix("-H")
                .doc("Use hard clipping 'H' in the SAM output."),
            ToolInput::new("markShorterSplits", Type::Boolean.optional())
                .prefix("-M")
                .doc("Mark shorter split hits as secondary (for Picard compatibility)."),
            ToolInput::new("verboseLevel", Type::Int.optional())
                .prefix("-v")
                .doc("Control the verbose level of the output: 0 for disabling all the output to stderr; 1 for outputting errors only; 2 for warnings and errors; 3 for all normal messages; 4 or higher for debugging."),
        ])
        .output(
            ToolOutput::new("out", Type::stdout(Sam), Selector::Stdout)
                .doc("The alignments, in the SAM format."),
        )
        .metadata(
            metadata()
                .dates((2018, 12, 24), (2020, 2, 26))
                .documentation(
                    "Align 70bp-1Mbp query sequences with the BWA-MEM algorithm. Briefly, the \
                    algorithm works by seeding alignments with maximal exact matches (MEMs) and \
                    then extending seeds with the affine-gap Smith-Waterman algorithm (SW).\n\n\
                    If mates is absent and option -p is not set, this command regards input reads \
                    are single-end. If mates is present, this command assumes the i-th read in \
                    reads and the i-th read in mates constitute a read pair.",
                )
                .documentation_url("http://bio-bwa.sourceforge.net/bwa.shtml#3"),
        )
}

fn index() -> CommandToolBuilder {
    CommandToolBuilder::new("BwaIndex")
        .friendly_name("BWA-Index")
        .tool_provider("BWA")
        .base_command(["bwa", "index"])
        .inputs([
            ToolInput::new("reference", Type::file(Fasta)).position(1),
            ToolInput::new("blockSize", Type::Int.optional())
                .prefix("-b")
                .doc("Block size for the bwtsw algorithm (effective with -a bwtsw) [10000000]."),
            ToolInput::new("algorithm", Type::String.optional())
                .prefix("-a")
                .doc("BWT construction algorithm: bwtsw, is or rb2 [auto]."),
        ])
        .output(ToolOutput::new(
            "out",
            Type::file(FastaBwa),
            Selector::Input("reference".into()),
        ))
        .metadata(
            metadata()
                .dates((2020, 2, 14), (2020, 2, 14))
                .documentation("Index database sequences in the FASTA format.")
                .documentation_url("http://bio-bwa.sourceforge.net/bwa.shtml#3"),
        )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tool::InputValues;

    #[test]
    pub fn it_renders_paired_reads_after_the_reference() {
        let tool = versioned(mem(), &versions()).remove(0).unwrap();
        let values: InputValues = serde_json::from_value(json!({
            "reference": "hg38.fasta",
            "reads": ["R1.fastq.gz", "R2.fastq.gz"],
            "threads": 16,
            "readGroupHeaderLine": "@RG\\tID:NA12878\\tSM:NA12878",
        }))
        .unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().tokens(),
            &[
                "bwa",
                "mem",
                "-t",
                "16",
                "-R",
                "@RG\\tID:NA12878\\tSM:NA12878",
                "hg38.fasta",
                "R1.fastq.gz",
                "R2.fastq.gz"
            ]
        );
    }

    #[test]
    pub fn it_requests_resources_for_alignment() {
        let tool = versioned(mem(), &versions()).remove(0).unwrap();
        match tool {
            Tool::Command(tool) => assert_eq!(tool.resources().cpus, Some(16)),
            _ => panic!("expected a command tool"),
        }
    }
}
