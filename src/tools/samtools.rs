//! Samtools: reading, writing, sorting and indexing alignments.
//!
//! Link: http://www.htslib.org/doc/samtools.html

use crate::tool::{
    CommandToolBuilder, Selector, Tool, ToolArgument, ToolInput, ToolMetadata, ToolOutput,
    VersionInfo,
};
use crate::tools::{versioned, MAINTAINERS};
use crate::types::alignment::{Bam, BamBai, Sam};
use crate::types::annotation::Bed;
use crate::types::reports::TextFile;
use crate::types::sequence::{Fasta, FastaFai, FastaWithDict};
use crate::types::{Filename, Type};

/// The samtools releases the definitions are published for.
pub fn versions() -> Vec<VersionInfo> {
    vec![
        VersionInfo::new("1.7.0", "biocontainers/samtools:v1.7.0_cv3"),
        VersionInfo::new("1.9.0", "quay.io/biocontainers/samtools:1.9--h8571acd_11"),
    ]
}

pub(crate) fn definitions() -> Vec<anyhow::Result<Tool>> {
    let versions = versions();
    [view(), index(), sort(), faidx(), flagstat(), mpileup()]
        .into_iter()
        .flat_map(|builder| versioned(builder, &versions))
        .collect()
}

fn metadata() -> ToolMetadata {
    ToolMetadata::new()
        .contributor(MAINTAINERS)
        .institution("Samtools")
        .doi("10.1093/bioinformatics/btp352")
        .citation(
            "Li H., Handsaker B., Wysoker A., Fennell T., Ruan J., Homer N., Marth G., \
            Abecasis G., Durbin R. and 1000 Genome Project Data Processing Subgroup (2009) \
            The Sequence alignment/map (SAM) format and SAMtools. Bioinformatics, 25, 2078-9.",
        )
        .keywords(["samtools"])
}

fn threads() -> ToolInput {
    ToolInput::new("threads", Type::Int.optional())
        .prefix("-@")
        .doc("Number of BAM compression threads to use in addition to main thread [0].")
}

fn view() -> CommandToolBuilder {
    CommandToolBuilder::new("SamToolsView")
        .friendly_name("SamTools: View")
        .tool_provider("Samtools")
        .base_command(["samtools", "view"])
        .argument(ToolArgument::new("-S").position(2))
        .argument(ToolArgument::new("-h").position(3))
        .argument(ToolArgument::new("-b").position(4))
        .inputs([
            ToolInput::new("sam", Type::file(Sam)).position(10),
            ToolInput::new(
                "outputFilename",
                Type::Filename(Filename::with_extension(".bam").prefix("sam")),
            )
            .prefix("-o")
            .position(5)
            .doc("Output to FILE [stdout]."),
            ToolInput::new("reference", Type::file(FastaWithDict).optional())
                .prefix("-T")
                .position(6)
                .doc(
                    "A FASTA format reference FILE, optionally compressed by bgzip and ideally \
                    indexed by samtools faidx. If an index is not present, one will be generated \
                    for you.",
                ),
            ToolInput::new("regions", Type::String.array().optional())
                .position(11)
                .doc(
                    "Region specifications after the input filename to restrict output to only \
                    those alignments which overlap the specified region(s).",
                ),
            ToolInput::new("cramOutput", Type::Boolean.optional())
                .prefix("-C")
                .position(5)
                .doc("Output in the CRAM format (requires -T)."),
            ToolInput::new("compressedBam", Type::Boolean.optional())
                .prefix("-1")
                .position(5)
                .doc("Enable fast BAM compression (implies -b)."),
            ToolInput::new("uncompressedBam", Type::Boolean.optional())
                .prefix("-u")
                .position(5)
                .doc("Output uncompressed BAM."),
            ToolInput::new("outputHeaderOnly", Type::Boolean.optional())
                .prefix("-H")
                .position(5)
                .doc("Output the header only."),
            ToolInput::new("countAlignments", Type::Boolean.optional())
                .prefix("-c")
                .position(5)
                .doc("Instead of printing the alignments, only count them and print the total number."),
            ToolInput::new("onlyOverlapping", Type::file(Bed).optional())
                .prefix("-L")
                .position(5)
                .doc("Only output alignments overlapping the input BED FILE [null]."),
            ToolInput::new("outputAlignmentsInReadGroup", Type::String.optional())
                .prefix("-r")
                .position(5)
                .doc("Only output alignments in read group STR [null]."),
            ToolInput::new("mapqThreshold", Type::Int.optional())
                .prefix("-q")
                .position(5)
                .doc("Skip alignments with MAPQ smaller than INT [0]."),
            ToolInput::new("outputAlignmentsInLibrary", Type::String.optional())
                .prefix("-l")
                .position(5)
                .doc("Only output alignments in library STR [null]."),
            ToolInput::new("outputAlignmentsWithBitsSet", Type::String.optional())
                .prefix("-f")
                .position(5)
                .doc("Only output alignments with all bits set in INT present in the FLAG field."),
            ToolInput::new("doNotOutputAlignmentsWithBitsSet", Type::String.optional())
                .prefix("-F")
                .position(5)
                .doc("Do not output alignments with any bits set in INT present in the FLAG field."),
            ToolInput::new("doNotOutputAlignmentsWithAllBitsSet", Type::String.optional())
                .prefix("-G")
                .position(5)
                .doc("Do not output alignments with all bits set in INT present in the FLAG field."),
            ToolInput::new("readTagToExclude", Type::String.optional())
                .prefix("-x")
                .position(5)
                .doc("Read tag to exclude from output (repeatable) [null]."),
            ToolInput::new("collapseBackwardCIGAR", Type::Boolean.optional())
                .prefix("-B")
                .position(5)
                .doc("Collapse the backward CIGAR operation."),
            ToolInput::new("subsamplingProportion", Type::Float.optional())
                .prefix("-s")
                .position(5)
                .doc(
                    "Output only a proportion of the input alignments. The integer part sets the \
                    seed and the fractional part sets the fraction of templates to keep.",
                ),
            threads().position(5),
        ])
        .output(
            ToolOutput::new("out", Type::file(Bam), Selector::Input("outputFilename".into()))
                .doc("The converted BAM."),
        )
        .metadata(
            metadata()
                .dates((2018, 12, 24), (2019, 1, 24))
                .documentation(
                    "With no options or regions specified, prints all alignments in the specified \
                    input alignment file (in SAM, BAM, or CRAM format) to standard output in SAM \
                    format (with no header). You may specify one or more space-separated region \
                    specifications after the input filename to restrict output to only those \
                    alignments which overlap the specified region(s). Use of region \
                    specifications requires a coordinate-sorted and indexed input file (in BAM or \
                    CRAM format).",
                )
                .documentation_url("http://www.htslib.org/doc/samtools.html#COMMANDS_AND_OPTIONS"),
        )
}

fn index() -> CommandToolBuilder {
    CommandToolBuilder::new("SamToolsIndex")
        .friendly_name("SamTools: Index")
        .tool_provider("Samtools")
        .base_command(["samtools", "index"])
        .argument(ToolArgument::new("-b").position(4))
        .inputs([
            ToolInput::new("bam", Type::file(Bam)).position(10),
            threads().position(5),
        ])
        .output(
            ToolOutput::new("out", Type::file(BamBai), Selector::Input("bam".into()))
                .doc("The BAM with its .bai index alongside."),
        )
        .metadata(
            metadata()
                .dates((2019, 12, 17), (2019, 12, 17))
                .documentation(
                    "Index a coordinate-sorted BAM or CRAM file for fast random access. This \
                    index is needed when region arguments are used to limit samtools view and \
                    similar commands to particular regions of interest.",
                )
                .documentation_url("http://www.htslib.org/doc/samtools-index.html"),
        )
}

fn sort() -> CommandToolBuilder {
    CommandToolBuilder::new("SamToolsSort")
        .friendly_name("SamTools: Sort")
        .tool_provider("Samtools")
        .base_command(["samtools", "sort"])
        .inputs([
            ToolInput::new("bam", Type::file(Bam)).position(10),
            ToolInput::new(
                "outputFilename",
                Type::Filename(
                    Filename::with_extension(".bam")
                        .prefix("bam")
                        .suffix(".sorted"),
                ),
            )
            .prefix("-o")
            .position(5)
            .doc("Write the final sorted output to FILE, rather than to standard output."),
            ToolInput::new("compression", Type::Int.optional())
                .prefix("-l")
                .position(5)
                .doc("Set the desired compression level for the final output file, ranging from 0 (uncompressed) to 9 (best)."),
            ToolInput::new("maximumMemory", Type::String.optional())
                .prefix("-m")
                .position(5)
                .doc("Approximately the maximum required memory per thread, specified either in bytes or with a K, M, or G suffix."),
            ToolInput::new("outputType", Type::String.optional())
                .prefix("-O")
                .position(5)
                .doc("Write the final output as sam, bam, or cram."),
            ToolInput::new("sortByReadNames", Type::Boolean.optional())
                .prefix("-n")
                .position(5)
                .doc("Sort by read names (i.e., the QNAME field) rather than by chromosomal coordinates."),
            ToolInput::new("tag", Type::String.optional())
                .prefix("-t")
                .position(5)
                .doc("Sort first by the value in the alignment tag TAG, then by position or name."),
            threads().position(5),
        ])
        .output(ToolOutput::new(
            "out",
            Type::file(Bam),
            Selector::Input("outputFilename".into()),
        ))
        .metadata(
            metadata()
                .dates((2018, 12, 24), (2019, 1, 24))
                .documentation(
                    "Sort alignments by leftmost coordinates, or by read name when -n is used. \
                    An appropriate @HD-SO sort order header tag will be added or an existing one \
                    updated if necessary.",
                )
                .documentation_url("http://www.htslib.org/doc/samtools.html#COMMANDS_AND_OPTIONS"),
        )
}

fn faidx() -> CommandToolBuilder {
    CommandToolBuilder::new("SamToolsFaidx")
        .friendly_name("SamTools: faidx")
        .tool_provider("Samtools")
        .base_command(["samtools", "faidx"])
        .input(ToolInput::new("reference", Type::file(Fasta)).position(1))
        .output(ToolOutput::new(
            "out",
            Type::file(FastaFai),
            Selector::Input("reference".into()),
        ))
        .metadata(
            metadata()
                .dates((2020, 2, 14), (2020, 2, 14))
                .documentation(
                    "Index reference sequence in the FASTA format or extract subsequence from \
                    indexed reference sequence. The index is written next to the reference as \
                    <ref.fasta>.fai.",
                )
                .documentation_url("http://www.htslib.org/doc/samtools-faidx.html"),
        )
}

fn flagstat() -> CommandToolBuilder {
    CommandToolBuilder::new("SamToolsFlagstat")
        .friendly_name("SamTools: Flagstat")
        .tool_provider("Samtools")
        .base_command(["samtools", "flagstat"])
        .inputs([
            ToolInput::new("bam", Type::file(Bam)).position(10),
            threads().position(5),
        ])
        .output(ToolOutput::new(
            "out",
            Type::stdout(TextFile),
            Selector::Stdout,
        ))
        .metadata(
            metadata()
                .dates((2019, 12, 17), (2019, 12, 17))
                .documentation(
                    "Does a full pass through the input file to calculate and print statistics to \
                    stdout. Provides counts for each of 13 categories based primarily on bit flags \
                    in the FLAG field.",
                )
                .documentation_url("http://www.htslib.org/doc/samtools-flagstat.html"),
        )
}

fn mpileup() -> CommandToolBuilder {
    CommandToolBuilder::new("SamToolsMpileup")
        .friendly_name("SamTools: Mpileup")
        .tool_provider("Samtools")
        .base_command(["samtools", "mpileup"])
        .inputs([
            ToolInput::new("bam", Type::file(BamBai)).position(10),
            ToolInput::new("illuminaEncoding", Type::Boolean.optional())
                .prefix("--illumina1.3+")
                .doc("Assume the quality is in the Illumina 1.3+ encoding."),
            ToolInput::new("countOrphans", Type::Boolean.optional())
                .prefix("--count-orphans")
                .doc("Do not skip anomalous read pairs in variant calling."),
            ToolInput::new("noBAQ", Type::Boolean.optional())
                .prefix("--no-BAQ")
                .doc("Disable probabilistic realignment for the computation of base alignment quality (BAQ)."),
            ToolInput::new("maxDepth", Type::Int.optional())
                .prefix("--max-depth")
                .doc("At a position, read maximally INT reads per input file."),
            ToolInput::new("positions", Type::file(Bed).optional())
                .prefix("--positions")
                .doc("BED or position list file containing a list of regions or sites where pileup should be generated."),
            ToolInput::new("reference", Type::file(FastaWithDict).optional())
                .prefix("--fasta-ref")
                .doc("The faidx-indexed reference file in the FASTA format."),
            ToolInput::new("region", Type::String.optional())
                .prefix("--region")
                .doc("Only generate pileup in region. Requires the BAM files to be indexed."),
            ToolInput::new("minMQ", Type::Int.optional())
                .prefix("--min-MQ")
                .doc("Minimum mapping quality for an alignment to be used [0]."),
            ToolInput::new("minBQ", Type::Int.optional())
                .prefix("--min-BQ")
                .doc("Minimum base quality for a base to be considered [13]."),
            ToolInput::new("outputMQ", Type::Boolean.optional())
                .prefix("--output-MQ")
                .doc("Output mapping quality."),
        ])
        .output(ToolOutput::new(
            "out",
            Type::stdout(TextFile),
            Selector::Stdout,
        ))
        .metadata(
            metadata()
                .dates((2019, 4, 8), (2019, 4, 8))
                .documentation(
                    "Generate text pileup output for one or multiple BAM files. Each input file \
                    produces a separate group of pileup columns in the output.",
                )
                .documentation_url("http://www.htslib.org/doc/samtools-mpileup.html"),
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
    pub fn it_builds_every_tool_at_every_version() {
        let tools = definitions();
        assert_eq!(tools.len(), 12);
        assert!(tools.iter().all(|t| t.is_ok()));
    }

    #[test]
    pub fn it_renders_samtools_view() {
        let tool = latest(view());
        let values: InputValues =
            serde_json::from_value(json!({ "sam": "/data/NA12878.sam", "threads": 4 })).unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().to_string(),
            "samtools view -S -h -b -o NA12878.bam -@ 4 /data/NA12878.sam"
        );
        assert_eq!(tool.container(), Some("quay.io/biocontainers/samtools:1.9--h8571acd_11"));
    }

    #[test]
    pub fn it_renders_samtools_sort_with_a_generated_name() {
        let tool = latest(sort());
        let values: InputValues =
            serde_json::from_value(json!({ "bam": "sample.bam", "sortByReadNames": true }))
                .unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().to_string(),
            "samtools sort -o sample.sorted.bam -n sample.bam"
        );
    }
}
