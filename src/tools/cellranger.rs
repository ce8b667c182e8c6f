//! Cell Ranger: single cell RNA-seq pipelines from 10x Genomics.
//!
//! Link: https://support.10xgenomics.com/single-cell-gene-expression/software/pipelines/latest/using/count

use crate::tool::{
    CommandToolBuilder, Selector, Tool, ToolArgument, ToolInput, ToolMetadata, ToolOutput,
    VersionInfo,
};
use crate::tools::{versioned, MAINTAINERS};
use crate::types::alignment::BamBai;
use crate::types::reports::{Csv, HtmlFile};
use crate::types::Type;

/// The Cell Ranger releases the definitions are published for.
pub fn versions() -> Vec<VersionInfo> {
    vec![VersionInfo::new("3.0.2", "cumulusprod/cellranger:3.0.2")]
}

pub(crate) fn definitions() -> Vec<anyhow::Result<Tool>> {
    versioned(count(), &versions())
}

/// A `--flag=value` option.
fn option(tag: &str, flag: &str, input_type: Type, doc: &str) -> ToolInput {
    ToolInput::new(tag, input_type)
        .prefix(format!("--{}=", flag))
        .joined()
        .doc(doc)
}

fn outs(tag: &str, output_type: Type, file: &str) -> ToolOutput {
    ToolOutput::new(
        tag,
        output_type,
        Selector::Wildcard(format!("*/outs/{}", file)),
    )
}

fn count() -> CommandToolBuilder {
    CommandToolBuilder::new("CellRangerCount")
        .friendly_name("CellRanger: count")
        .tool_provider("10X Genomics")
        .base_command(["cellranger", "count"])
        .argument(ToolArgument::new("--disable-ui"))
        .cpus(16)
        .memory_gb(64.0)
        .inputs([
            option(
                "id",
                "id",
                Type::String,
                "A unique run id, used to name output folder [a-zA-Z0-9_-]+.",
            ),
            option(
                "fastqs",
                "fastqs",
                Type::Directory,
                "Path of the fastq_path folder generated by cellranger mkfastq.",
            ),
            option(
                "transcriptome",
                "transcriptome",
                Type::Directory,
                "Path of folder containing 10x-compatible reference.",
            ),
            option(
                "sample",
                "sample",
                Type::String.optional(),
                "Prefix of the filenames of FASTQs to select.",
            ),
            option(
                "description",
                "description",
                Type::String.optional(),
                "Sample description to embed in output files.",
            ),
            option(
                "expectCells",
                "expect-cells",
                Type::Int.optional(),
                "Expected number of recovered cells.",
            ),
            option(
                "forceCells",
                "force-cells",
                Type::Int.optional(),
                "Force pipeline to use this number of cells, bypassing the cell detection algorithm.",
            ),
            option(
                "chemistry",
                "chemistry",
                Type::String.optional(),
                "Assay configuration. NOTE: by default the assay configuration is detected automatically.",
            ),
            ToolInput::new("noSecondary", Type::Boolean.optional())
                .prefix("--nosecondary")
                .doc("Disable secondary analysis, e.g. clustering. Optional."),
            option(
                "r1Length",
                "r1-length",
                Type::Int.optional(),
                "Hard trim the input Read 1 to this length before analysis.",
            ),
            option(
                "r2Length",
                "r2-length",
                Type::Int.optional(),
                "Hard trim the input Read 2 to this length before analysis.",
            ),
            option(
                "localCores",
                "localcores",
                Type::Int.optional(),
                "Set max cores the pipeline may request at one time. Only applies to local jobs.",
            ),
            option(
                "localMem",
                "localmem",
                Type::Int.optional(),
                "Set max GB the pipeline may request at one time. Only applies to local jobs.",
            ),
        ])
        .outputs([
            outs("out", Type::file(BamBai), "possorted_genome_bam.bam"),
            outs("webSummary", Type::file(HtmlFile), "web_summary.html"),
            outs("metrics", Type::file(Csv), "metrics_summary.csv"),
            ToolOutput::new(
                "filteredMatrix",
                Type::Directory,
                Selector::Wildcard("*/outs/filtered_feature_bc_matrix".into()),
            ),
        ])
        .metadata(
            ToolMetadata::new()
                .contributor(MAINTAINERS)
                .dates((2019, 4, 23), (2019, 4, 23))
                .institution("10X Genomics")
                .keywords(["cellranger", "single cell", "rna-seq"])
                .documentation(
                    "Count gene expression (targeted or whole-transcriptome) and/or feature \
                    barcode reads from a single sample and GEM well.",
                )
                .documentation_url(
                    "https://support.10xgenomics.com/single-cell-gene-expression/software/pipelines/latest/using/count",
                ),
        )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tool::InputValues;

    #[test]
    pub fn it_joins_options_to_their_values() {
        let tool = versioned(count(), &versions()).remove(0).unwrap();
        let values: InputValues = serde_json::from_value(json!({
            "id": "sample345",
            "fastqs": "/data/fastqs",
            "transcriptome": "/refs/GRCh38",
            "expectCells": 1000,
            "noSecondary": true,
        }))
        .unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().to_string(),
            "cellranger count --disable-ui --id=sample345 --fastqs=/data/fastqs \
            --transcriptome=/refs/GRCh38 --expect-cells=1000 --nosecondary"
        );
    }
}
