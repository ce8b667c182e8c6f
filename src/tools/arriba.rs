//! Arriba: detecting gene fusions from RNA-seq alignments.
//!
//! Link: https://arriba.readthedocs.io/en/latest/

use crate::tool::{
    CommandToolBuilder, Selector, Tool, ToolInput, ToolMetadata, ToolOutput, VersionInfo,
};
use crate::tools::{versioned, MAINTAINERS};
use crate::types::alignment::Bam;
use crate::types::annotation::Gtf;
use crate::types::reports::{GenericFile, Tsv};
use crate::types::sequence::Fasta;
use crate::types::{Filename, Type};

/// The Arriba releases the definitions are published for.
pub fn versions() -> Vec<VersionInfo> {
    vec![VersionInfo::new(
        "1.1.0",
        "quay.io/biocontainers/arriba:1.1.0--ha8b48f4_0",
    )]
}

pub(crate) fn definitions() -> Vec<anyhow::Result<Tool>> {
    versioned(arriba(), &versions())
}

fn arriba() -> CommandToolBuilder {
    CommandToolBuilder::new("Arriba")
        .friendly_name("Arriba")
        .tool_provider("Arriba")
        .base_command(["arriba"])
        .cpus(1)
        .memory_gb(8.0)
        .inputs([
            ToolInput::new("aligned", Type::file(Bam))
                .prefix("-x")
                .doc("File in SAM/BAM/CRAM format with main alignments as generated by STAR (Aligned.out.sam)."),
            ToolInput::new("inputChimeric", Type::file(Bam).optional())
                .prefix("-c")
                .doc("File in SAM/BAM/CRAM format with chimeric alignments as generated by STAR (Chimeric.out.sam)."),
            ToolInput::new(
                "outputFilename",
                Type::Filename(Filename::with_extension(".tsv").prefix("aligned").suffix(".fusions")),
            )
            .prefix("-o")
            .doc("Output file with fusions that have passed all filters."),
            ToolInput::new("discarded", Type::String.optional())
                .prefix("-O")
                .doc("Output file with fusions that were discarded due to filtering."),
            ToolInput::new("gtfFile", Type::file(Gtf))
                .prefix("-g")
                .doc("GTF file with gene annotation. The file may be gzip-compressed."),
            ToolInput::new("reference", Type::file(Fasta))
                .prefix("-a")
                .doc("FastA file with genome sequence (assembly). The file may be gzip-compressed."),
            ToolInput::new("blacklist", Type::file(Tsv).optional())
                .prefix("-b")
                .doc("File containing blacklisted events (recurrent artifacts and transcripts observed in healthy tissue)."),
            ToolInput::new("knownFusions", Type::file(Tsv).optional())
                .prefix("-k")
                .doc("File containing known/recurrent fusions. Some cancer entities are often characterized by fusions between the same pair of genes."),
            ToolInput::new("structuralVariants", Type::file(Tsv).optional())
                .prefix("-d")
                .doc("Tab-separated file with coordinates of structural variants found using whole-genome sequencing data."),
            ToolInput::new("annotationFeatures", Type::String.array().optional())
                .prefix("-G")
                .separator(" ")
                .doc("Comma-/space-separated list of names of GTF features."),
            ToolInput::new("strandedness", Type::String.optional())
                .prefix("-s")
                .doc("Whether a strand-specific protocol was used for library preparation: no, yes, reverse or auto."),
            ToolInput::new("contigs", Type::String.array().optional())
                .prefix("-i")
                .separator(",")
                .doc("Comma-/space-separated list of interesting contigs. Fusions between genes on other contigs are ignored."),
            ToolInput::new("filters", Type::String.array().optional())
                .prefix("-f")
                .separator(",")
                .doc("Comma-/space-separated list of filters to disable."),
            ToolInput::new("maxEValue", Type::Float.optional())
                .prefix("-E")
                .doc("Arriba estimates the number of fusions with a given number of supporting reads which one would expect to see by random chance. Default: 0.300000"),
            ToolInput::new("minSupport", Type::Int.optional())
                .prefix("-S")
                .doc("The filter 'min_support' discards all fusions with fewer than this many supporting reads. Default: 2"),
            ToolInput::new("maxMismappers", Type::Float.optional())
                .prefix("-m")
                .doc("When more than this fraction of supporting reads turns out to be mismappers, the filter 'mismappers' discards the fusion. Default: 0.800000"),
            ToolInput::new("threads", Type::Int.optional())
                .prefix("-T")
                .doc("Number of threads to use. Default: 1"),
            ToolInput::new("printSupportingReads", Type::Boolean.optional())
                .prefix("-I")
                .doc("When set, the column 'read_identifiers' is filled with identifiers of the reads which support the fusion."),
            ToolInput::new("printFusionSequence", Type::Boolean.optional())
                .prefix("-P")
                .doc("When set, the column 'fusion_transcript' is populated with the sequence of the fused genes."),
        ])
        .outputs([
            ToolOutput::new(
                "out",
                Type::file(Tsv),
                Selector::Input("outputFilename".into()),
            ),
            ToolOutput::new(
                "outDiscarded",
                Type::file(GenericFile).optional(),
                Selector::Input("discarded".into()),
            ),
        ])
        .metadata(
            ToolMetadata::new()
                .contributor(MAINTAINERS)
                .dates((2020, 9, 2), (2020, 9, 2))
                .institution("German Cancer Research Center (DKFZ)")
                .keywords(["arriba", "fusion", "rna-seq"])
                .documentation(
                    "Arriba is a command-line tool for the detection of gene fusions from RNA-Seq \
                    data. It was developed for the use in a clinical research setting. Therefore, \
                    short runtimes and high sensitivity were important design criteria. It is \
                    based on the ultrafast STAR aligner and the post-alignment runtime is \
                    typically just ~2 minutes. In contrast to many other fusion detection tools \
                    which build on STAR, Arriba does not require to reduce the parameter \
                    --alignIntronMax.",
                )
                .documentation_url("https://arriba.readthedocs.io/en/latest/"),
        )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tool::InputValues;

    #[test]
    pub fn it_names_the_fusions_after_the_alignments() {
        let tool = versioned(arriba(), &versions()).remove(0).unwrap();
        let values: InputValues = serde_json::from_value(json!({
            "aligned": "Aligned.out.bam",
            "gtfFile": "gencode.gtf",
            "reference": "hg38.fasta",
            "contigs": ["1", "2", "X"],
        }))
        .unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().to_string(),
            "arriba -x Aligned.out.bam -o Aligned.fusions.tsv -g gencode.gtf -a hg38.fasta -i 1,2,X"
        );
    }
}
