//! GATK 4: the Genome Analysis Toolkit, including the Picard tools it bundles.
//!
//! Link: https://gatk.broadinstitute.org/hc/en-us/articles/360036194592

use crate::tool::{
    CommandToolBuilder, Selector, Tool, ToolInput, ToolMetadata, ToolOutput, VersionInfo,
};
use crate::tools::{versioned, MAINTAINERS};
use crate::types::alignment::{Bam, BamBai};
use crate::types::annotation::Bed;
use crate::types::reports::{GenericFile, TextFile, Tsv};
use crate::types::sequence::{Fasta, FastaWithDict, SequenceDictionary};
use crate::types::variants::VcfTabix;
use crate::types::{Filename, Type};

/// The GATK releases the definitions are published for.
pub fn versions() -> Vec<VersionInfo> {
    vec![
        VersionInfo::new("4.0.12.0", "broadinstitute/gatk:4.0.12.0"),
        VersionInfo::new("4.1.2.0", "broadinstitute/gatk:4.1.2.0"),
        VersionInfo::new("4.1.3.0", "broadinstitute/gatk:4.1.3.0"),
        VersionInfo::new("4.1.4.0", "broadinstitute/gatk:4.1.4.0"),
    ]
}

pub(crate) fn definitions() -> Vec<anyhow::Result<Tool>> {
    let versions = versions();
    [
        haplotype_caller(),
        mark_duplicates(),
        sort_sam(),
        merge_sam_files(),
        base_recalibrator(),
        apply_bqsr(),
        mutect2(),
        collect_insert_size_metrics(),
        create_sequence_dictionary(),
    ]
    .into_iter()
    .flat_map(|builder| versioned(builder, &versions))
    .collect()
}

//=========//
// Helpers //
//=========//

/// The pieces every GATK 4 tool shares: the `gatk <Tool>` base command, the
/// memory requirements and the `--java-options` and `--tmp-dir` inputs.
fn gatk(id: &str, tool: &str, friendly_name: &str) -> CommandToolBuilder {
    CommandToolBuilder::new(id)
        .friendly_name(friendly_name)
        .tool_provider("GATK4")
        .base_command(["gatk", tool])
        .cpus(1)
        .memory_gb(4.0)
        .inputs([
            ToolInput::new("javaOptions", Type::String.array().optional())
                .prefix("--java-options")
                .separator(" ")
                .doc("Options passed to the JVM, e.g. -Xmx4G."),
            ToolInput::new("tmpDir", Type::String.optional())
                .prefix("--tmp-dir")
                .doc("Temp directory to use."),
        ])
}

fn metadata() -> ToolMetadata {
    ToolMetadata::new()
        .contributor(MAINTAINERS)
        .institution("Broad Institute")
        .doi("10.1101/gr.107524.110")
        .citation(
            "See https://software.broadinstitute.org/gatk/documentation/article?id=11027 for \
            more information",
        )
        .keywords(["gatk", "gatk4", "broad"])
}

/// The `out` BAM of the Picard tools, whose index replaces the `.bam`
/// extension (`x.bai`) instead of extending it.
fn indexed_bam() -> ToolOutput {
    ToolOutput::new(
        "out",
        Type::file(BamBai),
        Selector::Input("outputFilename".into()),
    )
    .secondaries_present_as(".bai", "^.bai")
}

fn reference(optional: bool) -> ToolInput {
    let input_type = Type::file(FastaWithDict);
    let input_type = if optional {
        input_type.optional()
    } else {
        input_type
    };

    ToolInput::new("reference", input_type)
        .prefix("--reference")
        .doc("Reference sequence file.")
}

fn intervals() -> ToolInput {
    ToolInput::new("intervals", Type::file(Bed).optional())
        .prefix("--intervals")
        .doc(
            "One or more genomic intervals over which to operate. This argument may be specified \
            0 or more times.",
        )
}

fn output(prefix: &str, suffix: &str, extension: &str) -> ToolInput {
    ToolInput::new(
        "outputFilename",
        Type::Filename(
            Filename::with_extension(extension)
                .prefix(prefix)
                .suffix(suffix),
        ),
    )
    .prefix("--OUTPUT")
}

fn create_index() -> ToolInput {
    ToolInput::new("createIndex", Type::Boolean.optional())
        .prefix("--CREATE_INDEX")
        .default(true)
        .doc("Whether to create a BAM index when writing a coordinate-sorted BAM file.")
}

fn max_records_in_ram() -> ToolInput {
    ToolInput::new("maxRecordsInRam", Type::Int.optional())
        .prefix("--MAX_RECORDS_IN_RAM")
        .doc(
            "When writing SAM files that need to be sorted, this will specify the number of \
            records stored in RAM before spilling to disk. Increasing this number reduces the \
            number of file handles needed to sort a SAM file, and increases the amount of RAM \
            needed. Default value: 500000.",
        )
}

fn validation_stringency() -> ToolInput {
    ToolInput::new("validationStringency", Type::String.optional())
        .prefix("--VALIDATION_STRINGENCY")
        .doc(
            "Validation stringency for all SAM files read by this program. Setting stringency to \
            SILENT can improve performance when processing a BAM file in which variable-length \
            data (read, qualities, tags) do not otherwise need to be decoded. Default value: \
            STRICT.",
        )
}

//=======//
// Tools //
//=======//

fn haplotype_caller() -> CommandToolBuilder {
    gatk(
        "Gatk4HaplotypeCaller",
        "HaplotypeCaller",
        "GATK4: Haplotype Caller",
    )
    .memory_gb(8.0)
    .inputs([
        ToolInput::new("inputRead", Type::file(BamBai))
            .prefix("--input")
            .doc("BAM/SAM/CRAM file containing reads."),
        reference(false),
        ToolInput::new(
            "outputFilename",
            Type::Filename(Filename::with_extension(".vcf.gz").prefix("inputRead")),
        )
        .prefix("--output")
        .doc("File to which variants should be written."),
        ToolInput::new("dbsnp", Type::file(VcfTabix).optional())
            .prefix("--dbsnp")
            .doc("A dbSNP VCF file."),
        intervals(),
        ToolInput::new("pcrIndelModel", Type::String.optional())
            .prefix("--pcr-indel-model")
            .doc("The PCR indel model to use. Default value: CONSERVATIVE."),
        ToolInput::new("emitRefConfidence", Type::String.optional())
            .prefix("--emit-ref-confidence")
            .doc("Mode for emitting reference confidence scores: NONE, BP_RESOLUTION or GVCF."),
        ToolInput::new("sampleName", Type::String.optional())
            .prefix("--sample-name")
            .doc("Name of single sample to use from a multi-sample bam."),
        ToolInput::new("samplePloidy", Type::Int.optional())
            .prefix("--sample-ploidy")
            .doc("Ploidy (number of chromosomes) per sample. Default value: 2."),
        ToolInput::new("annotation", Type::String.array().optional())
            .prefix("--annotation")
            .prefix_each()
            .doc("One or more specific annotations to add to variant calls."),
        ToolInput::new("gvcfGqBands", Type::Int.array().optional())
            .prefix("--gvcf-gq-bands")
            .prefix_each()
            .doc("Exclusive upper bounds for reference confidence GQ bands (must be in [1, 100] and specified in increasing order)."),
        ToolInput::new("minBaseQualityScore", Type::Int.optional())
            .prefix("--min-base-quality-score")
            .doc("Minimum base quality required to consider a base for calling. Default value: 10."),
    ])
    .output(
        ToolOutput::new(
            "out",
            Type::file(VcfTabix),
            Selector::Input("outputFilename".into()),
        )
        .doc("A raw, unfiltered, highly sensitive callset in VCF format."),
    )
    .metadata(
        metadata()
            .dates((2018, 12, 24), (2019, 9, 9))
            .documentation(
                "Call germline SNPs and indels via local re-assembly of haplotypes.\n\n\
                The HaplotypeCaller is capable of calling SNPs and indels simultaneously via local \
                de-novo assembly of haplotypes in an active region. In other words, whenever the \
                program encounters a region showing signs of variation, it discards the existing \
                mapping information and completely reassembles the reads in that region.",
            )
            .documentation_url(
                "https://gatk.broadinstitute.org/hc/en-us/articles/360036897372-HaplotypeCaller",
            ),
    )
}

fn mark_duplicates() -> CommandToolBuilder {
    gatk("Gatk4MarkDuplicates", "MarkDuplicates", "GATK4: Mark Duplicates")
        .memory_gb(8.0)
        .inputs([
            ToolInput::new("bam", Type::file(Bam).array())
                .prefix("--INPUT")
                .prefix_each()
                .doc("One or more input SAM or BAM files to analyze. Must be coordinate sorted."),
            output("bam", ".markduped", ".bam")
                .doc("The output file to write marked records to."),
            ToolInput::new(
                "metricsFilename",
                Type::Filename(
                    Filename::with_extension(".txt")
                        .prefix("bam")
                        .suffix(".metrics"),
                ),
            )
            .prefix("--METRICS_FILE")
            .doc("File to write duplication metrics to."),
            create_index(),
            max_records_in_ram(),
            validation_stringency(),
            ToolInput::new("assumeSortOrder", Type::String.optional())
                .prefix("--ASSUME_SORT_ORDER")
                .doc("If not null, assume that the input file has this order even if the header says otherwise."),
            ToolInput::new("opticalDuplicatePixelDistance", Type::Int.optional())
                .prefix("--OPTICAL_DUPLICATE_PIXEL_DISTANCE")
                .doc("The maximum offset between two duplicate clusters in order to consider them optical duplicates. Default value: 100."),
            ToolInput::new("removeDuplicates", Type::Boolean.optional())
                .prefix("--REMOVE_DUPLICATES")
                .doc("If true do not write duplicates to the output file instead of writing them with appropriate flags set."),
        ])
        .outputs([
            indexed_bam(),
            ToolOutput::new(
                "metrics",
                Type::file(Tsv),
                Selector::Input("metricsFilename".into()),
            ),
        ])
        .metadata(
            metadata()
                .dates((2018, 12, 24), (2019, 1, 24))
                .documentation(
                    "MarkDuplicates (Picard): Identifies duplicate reads.\n\n\
                    This tool locates and tags duplicate reads in a BAM or SAM file, where \
                    duplicate reads are defined as originating from a single fragment of DNA. \
                    Duplicates can arise during sample preparation e.g. library construction \
                    using PCR.",
                )
                .documentation_url(
                    "https://gatk.broadinstitute.org/hc/en-us/articles/360037052812-MarkDuplicates-Picard-",
                ),
        )
}

fn sort_sam() -> CommandToolBuilder {
    gatk("Gatk4SortSam", "SortSam", "GATK4: SortSam")
        .memory_gb(8.0)
        .inputs([
            ToolInput::new("bam", Type::file(Bam))
                .prefix("--INPUT")
                .doc("The SAM/BAM/CRAM file to sort."),
            output("bam", ".sorted", ".bam").doc("The sorted SAM/BAM/CRAM output file."),
            ToolInput::new("sortOrder", Type::String.optional())
                .prefix("--SORT_ORDER")
                .default("coordinate")
                .doc("The --SORT_ORDER argument is an enumerated type (SortOrder): queryname, coordinate, duplicate."),
            create_index(),
            max_records_in_ram(),
            validation_stringency(),
            reference(true),
        ])
        .output(indexed_bam())
        .metadata(
            metadata()
                .dates((2018, 12, 24), (2019, 1, 24))
                .documentation(
                    "Sorts a SAM/BAM/CRAM file. This tool sorts the input SAM or BAM file by \
                    coordinate, queryname (QNAME), or some other property of the SAM record.",
                )
                .documentation_url(
                    "https://gatk.broadinstitute.org/hc/en-us/articles/360036366192-SortSam-Picard-",
                ),
        )
}

fn merge_sam_files() -> CommandToolBuilder {
    gatk(
        "Gatk4MergeSamFiles",
        "MergeSamFiles",
        "GATK4: Merge SAM Files",
    )
    .inputs([
        ToolInput::new("bams", Type::file(BamBai).array())
            .prefix("--INPUT")
            .prefix_each()
            .doc("The SAM/BAM input files to merge."),
        ToolInput::new(
            "sampleName",
            Type::String.optional(),
        )
        .doc("Used to name the merged file."),
        output("sampleName", ".merged", ".bam").doc("The merged SAM or BAM file."),
        ToolInput::new("useThreading", Type::Boolean.optional())
            .prefix("--USE_THREADING")
            .doc("Option to create a background thread to encode, compress and write to disk the output file."),
        ToolInput::new("assumeSorted", Type::Boolean.optional())
            .prefix("--ASSUME_SORTED")
            .doc("If true, assume that the input files are in the same sort order as the requested output sort order, even if their headers say otherwise."),
        ToolInput::new("mergeSequenceDictionaries", Type::Boolean.optional())
            .prefix("--MERGE_SEQUENCE_DICTIONARIES")
            .doc("Merge the sequence dictionaries."),
        ToolInput::new("sortOrder", Type::String.optional())
            .prefix("--SORT_ORDER")
            .default("coordinate")
            .doc("Sort order of output file."),
        create_index(),
        max_records_in_ram(),
        validation_stringency(),
    ])
    .output(indexed_bam())
    .metadata(
        metadata()
            .dates((2018, 12, 24), (2019, 1, 24))
            .documentation(
                "Merges multiple SAM/BAM files into one file. This tool is used for combining \
                SAM and/or BAM files from different runs or read groups, similarly to the merge \
                function of Samtools.",
            )
            .documentation_url(
                "https://gatk.broadinstitute.org/hc/en-us/articles/360036713471-MergeSamFiles-Picard-",
            ),
    )
}

fn base_recalibrator() -> CommandToolBuilder {
    gatk(
        "Gatk4BaseRecalibrator",
        "BaseRecalibrator",
        "GATK4: Base Recalibrator",
    )
    .memory_gb(16.0)
    .inputs([
        ToolInput::new("bam", Type::file(BamBai))
            .prefix("--input")
            .doc("BAM/SAM/CRAM file containing reads."),
        reference(false),
        ToolInput::new("knownSites", Type::file(VcfTabix).array())
            .prefix("--known-sites")
            .prefix_each()
            .doc("One or more databases of known polymorphic sites used to exclude regions around known polymorphisms from analysis."),
        ToolInput::new(
            "outputFilename",
            Type::Filename(Filename::with_extension(".table").prefix("bam")),
        )
        .prefix("--output")
        .doc("The output recalibration table file to create."),
        intervals(),
    ])
    .output(ToolOutput::new(
        "out",
        Type::file(Tsv),
        Selector::Input("outputFilename".into()),
    ))
    .metadata(
        metadata()
            .dates((2018, 12, 24), (2019, 1, 24))
            .documentation(
                "First pass of the base quality score recalibration. Generates a recalibration \
                table based on various covariates. The default covariates are read group, \
                reported quality score, machine cycle, and nucleotide context.",
            )
            .documentation_url(
                "https://gatk.broadinstitute.org/hc/en-us/articles/360036726891-BaseRecalibrator",
            ),
    )
}

fn apply_bqsr() -> CommandToolBuilder {
    gatk("Gatk4ApplyBQSR", "ApplyBQSR", "GATK4: Apply base quality score recalibration")
        .memory_gb(8.0)
        .inputs([
            ToolInput::new("bam", Type::file(BamBai))
                .prefix("--input")
                .doc("The SAM/BAM/CRAM file containing reads."),
            reference(false),
            ToolInput::new("recalFile", Type::file(Tsv))
                .prefix("--bqsr-recal-file")
                .doc("Input recalibration table for BQSR."),
            ToolInput::new(
                "outputFilename",
                Type::Filename(
                    Filename::with_extension(".bam")
                        .prefix("bam")
                        .suffix(".recalibrated"),
                ),
            )
            .prefix("--output")
            .doc("Write output to this file."),
            intervals(),
        ])
        .output(indexed_bam())
        .metadata(
            metadata()
                .dates((2018, 12, 24), (2019, 1, 24))
                .documentation(
                    "Apply base quality score recalibration: this tool performs the second pass \
                    in a two-stage process called Base Quality Score Recalibration (BQSR). \
                    Specifically, it recalibrates the base qualities of the input reads based on \
                    the recalibration table produced by the BaseRecalibrator tool, and outputs a \
                    recalibrated BAM or CRAM file.",
                )
                .documentation_url(
                    "https://gatk.broadinstitute.org/hc/en-us/articles/360037055712-ApplyBQSR",
                ),
        )
}

fn mutect2() -> CommandToolBuilder {
    gatk("Gatk4Mutect2", "Mutect2", "GATK4: MuTect2")
        .memory_gb(16.0)
        .inputs([
            ToolInput::new("tumorBams", Type::file(BamBai).array())
                .prefix("--input")
                .prefix_each()
                .doc("BAM/SAM/CRAM files containing reads from tumor samples."),
            ToolInput::new("normalBams", Type::file(BamBai).array().optional())
                .prefix("--input")
                .prefix_each()
                .doc("BAM/SAM/CRAM files containing reads from normal samples."),
            ToolInput::new("normalSample", Type::String.optional())
                .prefix("--normal-sample")
                .doc("Sample name of the normal sample."),
            reference(false),
            ToolInput::new(
                "outputFilename",
                Type::Filename(Filename::with_extension(".vcf.gz").suffix(".mutect2")),
            )
            .prefix("--output")
            .doc("The output VCF."),
            ToolInput::new("germlineResource", Type::file(VcfTabix).optional())
                .prefix("--germline-resource")
                .doc("Population vcf of germline sequencing containing allele fractions."),
            ToolInput::new("panelOfNormals", Type::file(VcfTabix).optional())
                .prefix("--panel-of-normals")
                .doc("VCF file of sites observed in normal."),
            intervals(),
            ToolInput::new("afOfAllelesNotInResource", Type::Float.optional())
                .prefix("--af-of-alleles-not-in-resource")
                .doc("Population allele fraction assigned to alleles not found in germline resource."),
        ])
        .output(
            ToolOutput::new(
                "out",
                Type::file(VcfTabix),
                Selector::Input("outputFilename".into()),
            )
            .doc("The unfiltered somatic calls."),
        )
        .metadata(
            metadata()
                .dates((2018, 12, 24), (2019, 1, 24))
                .documentation(
                    "Call somatic short variants via local assembly of haplotypes. Short \
                    variants include single nucleotide (SNV) and insertion and deletion (indel) \
                    variants. The caller combines the DREAM challenge-winning somatic genotyping \
                    engine of the original MuTect with the assembly-based machinery of \
                    HaplotypeCaller.",
                )
                .documentation_url(
                    "https://gatk.broadinstitute.org/hc/en-us/articles/360037593851-Mutect2",
                ),
        )
}

fn collect_insert_size_metrics() -> CommandToolBuilder {
    gatk(
        "Gatk4CollectInsertSizeMetrics",
        "CollectInsertSizeMetrics",
        "GATK4: CollectInsertSizeMetrics",
    )
    .memory_gb(8.0)
    .inputs([
        ToolInput::new("bam", Type::file(BamBai))
            .prefix("--INPUT")
            .doc("Input SAM or BAM file."),
        output("bam", ".metrics", ".txt").doc("File to write the output to."),
        ToolInput::new(
            "outputHistogram",
            Type::Filename(
                Filename::with_extension(".pdf")
                    .prefix("bam")
                    .suffix(".histogram"),
            ),
        )
        .prefix("--Histogram_FILE")
        .doc("File to write insert size Histogram chart to."),
        reference(true),
        ToolInput::new("includeDuplicates", Type::Boolean.optional())
            .prefix("--INCLUDE_DUPLICATES")
            .doc("If true, also include reads marked as duplicates in the insert size histogram."),
        ToolInput::new("minimumPercentage", Type::Float.optional())
            .prefix("--MINIMUM_PCT")
            .doc("When generating the Histogram, discard any data categories (out of FR, TANDEM, RF) that have fewer than this percentage of overall reads. Default value: 0.05."),
        validation_stringency(),
    ])
    .outputs([
        ToolOutput::new(
            "out",
            Type::file(TextFile),
            Selector::Input("outputFilename".into()),
        ),
        ToolOutput::new(
            "outHistogram",
            Type::file(GenericFile),
            Selector::Input("outputHistogram".into()),
        ),
    ])
    .metadata(
        metadata()
            .dates((2019, 2, 28), (2019, 2, 28))
            .documentation(
                "Provides useful metrics for validating library construction including the \
                insert size distribution and read orientation of paired-end libraries.",
            )
            .documentation_url(
                "https://gatk.broadinstitute.org/hc/en-us/articles/360036715591-CollectInsertSizeMetrics-Picard-",
            ),
    )
}

fn create_sequence_dictionary() -> CommandToolBuilder {
    gatk(
        "Gatk4CreateSequenceDictionary",
        "CreateSequenceDictionary",
        "GATK4: Create Sequence Dictionary",
    )
    .inputs([
        ToolInput::new("reference", Type::file(Fasta))
            .prefix("--REFERENCE")
            .doc("Input reference fasta or fasta.gz."),
        output("reference", "", ".dict").doc("Output SAM file containing only the sequence dictionary."),
    ])
    .output(ToolOutput::new(
        "out",
        Type::file(SequenceDictionary),
        Selector::Input("outputFilename".into()),
    ))
    .metadata(
        metadata()
            .dates((2020, 2, 14), (2020, 2, 14))
            .documentation(
                "Creates a sequence dictionary for a reference sequence. The output is a SAM \
                header listing the name and length of every contig, which is read when splitting \
                work into intervals by contig.",
            )
            .documentation_url(
                "https://gatk.broadinstitute.org/hc/en-us/articles/360036712531-CreateSequenceDictionary-Picard-",
            ),
    )
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use serde_json::json;

    use super::*;
    use crate::tool::InputValues;

    fn latest(builder: CommandToolBuilder) -> Tool {
        versioned(builder, &versions()).pop().unwrap().unwrap()
    }

    #[test]
    pub fn it_builds_every_tool_at_every_version() {
        let tools = definitions();
        assert_eq!(tools.len(), 36);
        assert!(tools.iter().all(|t| t.is_ok()));
    }

    #[test]
    pub fn it_renders_sortsam_with_its_defaults() {
        let tool = latest(sort_sam());
        let values: InputValues = serde_json::from_value(json!({
            "bam": "NA12878.bam",
            "tmpDir": "/tmp",
        }))
        .unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().to_string(),
            "gatk SortSam --tmp-dir /tmp --INPUT NA12878.bam --OUTPUT NA12878.sorted.bam \
            --SORT_ORDER coordinate --CREATE_INDEX"
        );
    }

    #[test]
    pub fn it_finds_the_picard_index_next_to_the_sorted_bam() {
        for builder in [sort_sam(), mark_duplicates(), merge_sam_files(), apply_bqsr()] {
            let tool = match latest(builder) {
                Tool::Command(tool) => tool,
                other => panic!("{} is not a command tool", other.id()),
            };

            assert_eq!(
                tool.output("out")
                    .unwrap()
                    .secondary_file_paths(Path::new("x.sorted.bam"))
                    .unwrap(),
                vec![PathBuf::from("x.sorted.bai")]
            );
        }
    }

    #[test]
    pub fn it_repeats_the_prefix_for_known_sites() {
        let tool = latest(base_recalibrator());
        let values: InputValues = serde_json::from_value(json!({
            "bam": "NA12878.bam",
            "reference": "hg38.fasta",
            "knownSites": ["dbsnp.vcf.gz", "mills.vcf.gz"],
        }))
        .unwrap();

        let tokens = tool.command_line(&values).unwrap().tokens().to_vec();
        assert_eq!(tokens.iter().filter(|t| *t == "--known-sites").count(), 2);
        assert!(tokens.contains(&"NA12878.table".to_string()));
    }

    #[test]
    pub fn it_publishes_every_version_in_its_own_container() {
        let containers = versioned(haplotype_caller(), &versions())
            .into_iter()
            .map(|t| t.unwrap().container().unwrap().to_string())
            .collect::<Vec<_>>();

        assert_eq!(containers.len(), 4);
        assert!(containers
            .iter()
            .all(|c| c.starts_with("broadinstitute/gatk:4.")));
    }
}
