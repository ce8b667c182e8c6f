//! The workflows in the catalog.
//!
//! Workflows are built after every provider's tools have been registered, so
//! that each step can be resolved (see [`crate::registry::Registry::discover`]).

use crate::tool::ToolMetadata;
use crate::tools::MAINTAINERS;
use crate::types::alignment::{Bam, BamBai};
use crate::types::annotation::Bed;
use crate::types::sequence::{FastaWithDict, FastaWithIndexes, FastqGz};
use crate::types::variants::VcfTabix;
use crate::types::Type;
use crate::workflow::{Source, Step, WorkflowBuilder};

/// Gets all of the workflows in the catalog, unbuilt. When a new workflow is
/// added, this needs to be updated.
pub fn get_all_workflows() -> Vec<WorkflowBuilder> {
    vec![
        bwa_aligner(),
        mark_duplicates_and_qc(),
        germline_variant_caller(),
    ]
}

fn metadata() -> ToolMetadata {
    ToolMetadata::new().contributor(MAINTAINERS)
}

/// Trims, aligns, converts and sorts a sample's reads.
fn bwa_aligner() -> WorkflowBuilder {
    WorkflowBuilder::new("BwaAligner", "1.0.0")
        .friendly_name("Align and sort reads")
        .input("reference", Type::file(FastaWithIndexes))
        .input("fastq", Type::file(FastqGz).array())
        .input("cutadaptAdapters", Type::String.array().optional())
        .input("sortSamTmpDir", Type::String.optional())
        .step(
            Step::new("cutadapt", "CutAdapt")
                .source("fastq", Source::input("fastq"))
                .source("adapter", Source::input("cutadaptAdapters"))
                .source("secondAdapter", Source::input("cutadaptAdapters"))
                .source("qualityCutoff", Source::value(15))
                .source("minimumLength", Source::value(50)),
        )
        .step(
            Step::new("bwamem", "BwaMemLatest")
                .source("reference", Source::input("reference"))
                .source("reads", Source::step("cutadapt", "out"))
                .source("markShorterSplits", Source::value(true)),
        )
        .step(
            Step::new("samtoolsview", "SamToolsView")
                .source("sam", Source::step("bwamem", "out")),
        )
        .step(
            Step::new("sortsam", "Gatk4SortSam")
                .source("bam", Source::step("samtoolsview", "out"))
                .source("sortOrder", Source::value("coordinate"))
                .source("createIndex", Source::value(true))
                .source("validationStringency", Source::value("SILENT"))
                .source("maxRecordsInRam", Source::value(5_000_000))
                .source("tmpDir", Source::input("sortSamTmpDir")),
        )
        .output("out", "sortsam", "out")
        .metadata(
            metadata()
                .dates((2018, 12, 24), (2020, 2, 14))
                .documentation(
                    "Align sample reads using the Burrows-Wheeler Aligner (BWA MEM), convert to \
                    BAM with samtools view, and sort using GATK4 SortSam. Adapters are trimmed \
                    with cutadapt first.",
                ),
        )
}

/// Marks duplicates across a sample's alignments, and collects alignment
/// metrics on the result.
fn mark_duplicates_and_qc() -> WorkflowBuilder {
    WorkflowBuilder::new("MarkDuplicatesAndQc", "1.0.0")
        .friendly_name("Mark duplicates and collect alignment metrics")
        .input("bams", Type::file(Bam).array())
        .input("reference", Type::file(FastaWithDict).optional())
        .step(
            Step::new("markduplicates", "Gatk4MarkDuplicates")
                .source("bam", Source::input("bams")),
        )
        .step(
            Step::new("insertsizes", "Gatk4CollectInsertSizeMetrics")
                .source("bam", Source::step("markduplicates", "out"))
                .source("reference", Source::input("reference")),
        )
        .step(
            Step::new("flagstat", "SamToolsFlagstat")
                .source("bam", Source::step("markduplicates", "out")),
        )
        .output("out", "markduplicates", "out")
        .output("duplicationMetrics", "markduplicates", "metrics")
        .output("insertSizeMetrics", "insertsizes", "out")
        .output("flagstat", "flagstat", "out")
        .metadata(
            metadata()
                .dates((2020, 2, 14), (2020, 2, 14))
                .documentation(
                    "Merge a sample's alignments while marking duplicates with GATK4 \
                    MarkDuplicates, then collect insert size metrics and samtools flagstat \
                    counts on the marked alignments.",
                ),
        )
}

/// Recalibrates base qualities and calls germline variants.
fn germline_variant_caller() -> WorkflowBuilder {
    WorkflowBuilder::new("GermlineVariantCaller", "1.0.0")
        .friendly_name("GATK4 germline variant caller")
        .input("bam", Type::file(BamBai))
        .input("reference", Type::file(FastaWithDict))
        .input("knownSites", Type::file(VcfTabix).array())
        .input("dbsnp", Type::file(VcfTabix).optional())
        .input("intervals", Type::file(Bed).optional())
        .step(
            Step::new("baserecalibrator", "Gatk4BaseRecalibrator")
                .source("bam", Source::input("bam"))
                .source("reference", Source::input("reference"))
                .source("knownSites", Source::input("knownSites"))
                .source("intervals", Source::input("intervals")),
        )
        .step(
            Step::new("applybqsr", "Gatk4ApplyBQSR")
                .source("bam", Source::input("bam"))
                .source("reference", Source::input("reference"))
                .source("recalFile", Source::step("baserecalibrator", "out"))
                .source("intervals", Source::input("intervals")),
        )
        .step(
            Step::new("haplotypecaller", "Gatk4HaplotypeCaller")
                .source("inputRead", Source::step("applybqsr", "out"))
                .source("reference", Source::input("reference"))
                .source("dbsnp", Source::input("dbsnp"))
                .source("intervals", Source::input("intervals")),
        )
        .output("out", "haplotypecaller", "out")
        .output("recalibratedBam", "applybqsr", "out")
        .metadata(
            metadata()
                .dates((2019, 1, 24), (2020, 2, 14))
                .documentation(
                    "Recalibrate base quality scores with GATK4 BaseRecalibrator and ApplyBQSR, \
                    then call germline SNPs and indels with GATK4 HaplotypeCaller. Intervals \
                    restrict every step when given, e.g. one of the BED files produced by \
                    GenerateIntervalsByChromosome.",
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ErrorPolicy, Registry, RegistryConfig};
    use crate::tool::Tool;

    fn registry() -> Registry {
        Registry::discover(&RegistryConfig {
            errors: ErrorPolicy::Fail,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn it_registers_every_workflow() {
        let registry = registry();
        for workflow in get_all_workflows() {
            let built = workflow.build(&registry).unwrap();
            assert!(registry.tool(built.id(), None).is_some());
        }
    }

    #[test]
    fn it_resolves_the_default_tool_versions() {
        let registry = registry();
        let aligner = match registry.tool("BwaAligner", None) {
            Some(Tool::Workflow(workflow)) => workflow,
            _ => panic!("expected the BwaAligner workflow"),
        };

        let sortsam = aligner.steps().iter().find(|s| s.id == "sortsam").unwrap();
        assert_eq!(sortsam.tool_version.as_deref(), Some("4.1.4.0"));
        assert_eq!(aligner.outputs()[0].output_type.to_string(), "BamBai");
    }

    #[test]
    fn it_fails_without_the_tools_it_uses() {
        let registry = Registry::discover(&RegistryConfig {
            ignore: vec![String::from("gatk4")],
            ..Default::default()
        })
        .unwrap();

        let err = germline_variant_caller().build(&registry).unwrap_err();
        assert!(err.to_string().contains("unknown tool Gatk4BaseRecalibrator"));
        assert!(registry.tool("GermlineVariantCaller", None).is_none());
    }
}
