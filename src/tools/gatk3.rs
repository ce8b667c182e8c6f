//! GATK 3: the tools of the Genome Analysis Toolkit that were not carried over
//! to GATK 4.
//!
//! Link: https://github.com/broadgsa/gatk

use crate::tool::{
    CommandToolBuilder, Selector, Tool, ToolInput, ToolMetadata, ToolOutput, VersionInfo,
};
use crate::tools::{versioned, MAINTAINERS};
use crate::types::alignment::BamBai;
use crate::types::annotation::Bed;
use crate::types::reports::{Csv, GenericFile};
use crate::types::sequence::FastaWithDict;
use crate::types::Type;

/// The GATK 3 releases the definitions are published for.
pub fn versions() -> Vec<VersionInfo> {
    vec![VersionInfo::new("3.8-1", "broadinstitute/gatk3:3.8-1")]
}

pub(crate) fn definitions() -> Vec<anyhow::Result<Tool>> {
    versioned(depth_of_coverage(), &versions())
}

fn summary(tag: &str, extension: &str) -> ToolOutput {
    ToolOutput::new(
        tag,
        Type::file(Csv),
        Selector::Wildcard(format!("*{}", extension)),
    )
}

fn depth_of_coverage() -> CommandToolBuilder {
    CommandToolBuilder::new("Gatk3DepthOfCoverage")
        .friendly_name("GATK3 DepthOfCoverage: Determine coverage at different levels of partitioning and aggregation.")
        .tool_provider("GATK3")
        .base_command(["java", "-jar", "/usr/GenomeAnalysisTK.jar", "-T", "DepthOfCoverage"])
        .cpus(1)
        .memory_gb(8.0)
        .inputs([
            ToolInput::new("bam", Type::file(BamBai))
                .prefix("-I")
                .position(6)
                .doc("Input file containing sequence data (BAM or CRAM)."),
            ToolInput::new("reference", Type::file(FastaWithDict))
                .prefix("-R")
                .position(7)
                .doc("Reference sequence file."),
            ToolInput::new("outputPrefix", Type::String)
                .prefix("-o")
                .position(8)
                .doc("An output file created by the walker. Will overwrite contents if file exists."),
            ToolInput::new("intervals", Type::file(Bed).optional())
                .prefix("-L")
                .position(9)
                .doc("One or more genomic intervals over which to operate."),
            ToolInput::new("excludeIntervals", Type::file(Bed).optional())
                .prefix("--excludeIntervals")
                .position(10)
                .doc("One or more genomic intervals to exclude from processing."),
            ToolInput::new("countType", Type::String.optional())
                .prefix("--countType")
                .position(10)
                .doc("How should overlapping reads from the same fragment be handled? (Possible values: {COUNT_READS, COUNT_FRAGMENTS, COUNT_FRAGMENTS_REQUIRE_SAME_BASE})"),
            ToolInput::new("summaryCoverageThreshold", Type::Int.array().optional())
                .prefix("-ct")
                .prefix_each()
                .position(10)
                .doc("Coverage threshold (in percent) for summarizing statistics."),
            ToolInput::new("omitDepthOutputAtEachBase", Type::Boolean.optional())
                .prefix("--omitDepthOutputAtEachBase")
                .position(10)
                .doc("Do not output depth of coverage at each base."),
            ToolInput::new("omitIntervalStatistics", Type::Boolean.optional())
                .prefix("--omitIntervalStatistics")
                .position(10)
                .doc("Do not calculate per-interval statistics."),
            ToolInput::new("omitLocusTable", Type::Boolean.optional())
                .prefix("--omitLocusTable")
                .position(10)
                .doc("Do not calculate per-sample per-depth counts of loci."),
            ToolInput::new("minBaseQuality", Type::Int.optional())
                .prefix("--minBaseQuality")
                .position(10)
                .doc("Minimum quality of bases to count towards depth."),
            ToolInput::new("minMappingQuality", Type::Int.optional())
                .prefix("--minMappingQuality")
                .position(10)
                .doc("Minimum mapping quality of reads to count towards depth."),
            ToolInput::new("outputFormat", Type::String.optional())
                .prefix("--outputFormat")
                .position(10)
                .default("csv")
                .doc("The format of the output file. Possible values: {rtable, csv, table}"),
        ])
        .outputs([
            ToolOutput::new(
                "sample",
                Type::file(GenericFile),
                Selector::Input("outputPrefix".into()),
            )
            .doc("Per locus coverage."),
            summary("sampleCumulativeCoverageCounts", ".sample_cumulative_coverage_counts"),
            summary(
                "sampleCumulativeCoverageProportions",
                ".sample_cumulative_coverage_proportions",
            ),
            summary("sampleIntervalStatistics", ".sample_interval_statistics"),
            summary("sampleIntervalSummary", ".sample_interval_summary"),
            summary("sampleStatistics", ".sample_statistics"),
            summary("sampleSummary", ".sample_summary"),
        ])
        .metadata(
            ToolMetadata::new()
                .contributor(MAINTAINERS)
                .dates((2019, 12, 2), (2019, 12, 2))
                .institution("Broad Institute")
                .keywords(["gatk", "gatk3", "coverage"])
                .documentation(
                    "Overview: This tool processes a set of bam files to determine coverage at \
                    different levels of partitioning and aggregation. Coverage can be analyzed \
                    per locus, per interval, per gene, or in total; can be partitioned by sample, \
                    by read group, by technology, by center, or by library; and can be summarized \
                    by mean, median, quartiles, and/or percentage of bases covered to or beyond a \
                    threshold. Additionally, reads and bases can be filtered by mapping or base \
                    quality score.",
                )
                .documentation_url(
                    "https://github.com/broadinstitute/gatk-docs/blob/master/gatk3-tooldocs/2016-08-24-3.6-0/org_broadinstitute_gatk_tools_walkers_coverage_DepthOfCoverage.md",
                ),
        )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tool::InputValues;

    #[test]
    pub fn it_runs_through_the_gatk3_jar() {
        let tool = versioned(depth_of_coverage(), &versions()).remove(0).unwrap();
        let values: InputValues = serde_json::from_value(json!({
            "bam": "NA12878.bam",
            "reference": "hg38.fasta",
            "outputPrefix": "NA12878",
            "summaryCoverageThreshold": [1, 50, 100],
        }))
        .unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().to_string(),
            "java -jar /usr/GenomeAnalysisTK.jar -T DepthOfCoverage -I NA12878.bam -R hg38.fasta \
            -o NA12878 -ct 1 -ct 50 -ct 100 --outputFormat csv"
        );
    }

    #[test]
    pub fn it_collects_every_summary() {
        let tool = versioned(depth_of_coverage(), &versions()).remove(0).unwrap();
        assert_eq!(tool.output_parameters().len(), 7);
    }
}
