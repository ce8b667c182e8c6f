//! FastQC: quality control reports for high-throughput sequence data.
//!
//! Link: http://www.bioinformatics.babraham.ac.uk/projects/fastqc/

use crate::tool::{
    CommandToolBuilder, Selector, Tool, ToolInput, ToolMetadata, ToolOutput, VersionInfo,
};
use crate::tools::{versioned, MAINTAINERS};
use crate::types::reports::{TextFile, ZipFile};
use crate::types::sequence::FastqGz;
use crate::types::Type;

/// The FastQC releases the definitions are published for.
pub fn versions() -> Vec<VersionInfo> {
    vec![
        VersionInfo::new("v0.11.5", "quay.io/biocontainers/fastqc:0.11.5--pl5.22.0_3"),
        VersionInfo::new("v0.11.8", "quay.io/biocontainers/fastqc:0.11.8--1"),
    ]
}

pub(crate) fn definitions() -> Vec<anyhow::Result<Tool>> {
    versioned(fastqc(), &versions())
}

fn fastqc() -> CommandToolBuilder {
    CommandToolBuilder::new("FastQC")
        .friendly_name("FastQC")
        .tool_provider("Babraham Bioinformatics")
        .base_command(["fastqc"])
        .cpus(1)
        .memory_gb(8.0)
        .inputs([
            ToolInput::new("reads", Type::file(FastqGz).array()).position(100),
            ToolInput::new("outdir", Type::String.optional())
                .prefix("--outdir")
                .default(".")
                .doc("Create all output files in the specified output directory."),
            ToolInput::new("casava", Type::Boolean.optional())
                .prefix("--casava")
                .doc("Files come from raw casava output. Files in the same sample group (differing only by the group number) will be analysed as a set rather than individually."),
            ToolInput::new("nano", Type::Boolean.optional())
                .prefix("--nano")
                .doc("Files come from naopore sequences and are in fast5 format."),
            ToolInput::new("nofilter", Type::Boolean.optional())
                .prefix("--nofilter")
                .doc("If running with --casava then don't remove read flagged by casava as poor quality when performing the QC analysis."),
            ToolInput::new("extract", Type::Boolean.optional())
                .prefix("--extract")
                .default(true)
                .doc("If set then the zipped output file will be uncompressed in the same directory after it has been created."),
            ToolInput::new("java", Type::String.optional())
                .prefix("--java")
                .doc("Provides the full path to the java binary you want to use to launch fastqc."),
            ToolInput::new("noextract", Type::Boolean.optional())
                .prefix("--noextract")
                .doc("Do not uncompress the output file after creating it."),
            ToolInput::new("nogroup", Type::Boolean.optional())
                .prefix("--nogroup")
                .doc("Disable grouping of bases for reads >50bp."),
            ToolInput::new("minLength", Type::Int.optional())
                .prefix("--min_length")
                .doc("Sets an artificial lower limit on the length of the sequence to be shown in the report."),
            ToolInput::new("format", Type::String.optional())
                .prefix("--format")
                .doc("Bypasses the normal sequence file format detection and forces the program to use the specified format. Valid formats are bam,sam,bam_mapped,sam_mapped and fastq."),
            ToolInput::new("threads", Type::Int.optional())
                .prefix("--threads")
                .doc("Specifies the number of files which can be processed simultaneously. Each thread will be allocated 250MB of memory."),
            ToolInput::new("contaminants", Type::file(TextFile).optional())
                .prefix("--contaminants")
                .doc("Specifies a non-default file which contains the list of contaminants to screen overrepresented sequences against. The file must contain sets of named contaminants in the form name[tab]sequence."),
            ToolInput::new("adapters", Type::file(TextFile).optional())
                .prefix("--adapters")
                .doc("Specifies a non-default file which contains the list of adapter sequences which will be explicitly searched against the library. The file must contain sets of named adapters in the form name[tab]sequence."),
            ToolInput::new("limits", Type::file(TextFile).optional())
                .prefix("--limits")
                .doc("Specifies a non-default file which contains a set of criteria which will be used to determine the warn/error limits for the various modules."),
            ToolInput::new("kmers", Type::Int.optional())
                .prefix("--kmers")
                .doc("Specifies the length of Kmer to look for in the Kmer content module. Specified Kmer length must be between 2 and 10. Default length is 7 if not specified."),
            ToolInput::new("quiet", Type::Boolean.optional())
                .prefix("--quiet")
                .doc("Supress all progress messages on stdout and only report errors."),
            ToolInput::new("dir", Type::String.optional())
                .prefix("--dir")
                .doc("Selects a directory to be used for temporary files written when generating report images."),
        ])
        .outputs([
            ToolOutput::new(
                "out",
                Type::file(ZipFile).array(),
                Selector::Wildcard("*.zip".into()),
            )
            .doc("The zipped reports, one per input file."),
            ToolOutput::new(
                "datafile",
                Type::file(TextFile).array(),
                Selector::Wildcard("*/fastqc_data.txt".into()),
            )
            .doc("The extracted fastqc_data.txt of every report."),
        ])
        .metadata(
            ToolMetadata::new()
                .contributor(MAINTAINERS)
                .dates((2019, 3, 25), (2019, 3, 25))
                .institution("Babraham Bioinformatics")
                .keywords(["fastqc", "quality control"])
                .documentation(
                    "FastQC aims to provide a simple way to do some quality control checks on raw \
                    sequence data coming from high throughput sequencing pipelines. It provides a \
                    modular set of analyses which you can use to give a quick impression of \
                    whether your data has any problems of which you should be aware before doing \
                    any further analysis.\n\n\
                    The main functions of FastQC are:\n\
                    - Import of data from BAM, SAM or FastQ files (any variant)\n\
                    - Providing a quick overview to tell you in which areas there may be problems\n\
                    - Summary graphs and tables to quickly assess your data\n\
                    - Export of results to an HTML based permanent report\n\
                    - Offline operation to allow automated generation of reports without running \
                    the interactive application",
                )
                .documentation_url("http://www.bioinformatics.babraham.ac.uk/projects/fastqc/"),
        )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tool::InputValues;

    #[test]
    pub fn it_extracts_reports_by_default() {
        let tool = versioned(fastqc(), &versions()).pop().unwrap().unwrap();
        let values: InputValues =
            serde_json::from_value(json!({ "reads": ["a.fastq.gz", "b.fastq.gz"] })).unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().to_string(),
            "fastqc --outdir . --extract a.fastq.gz b.fastq.gz"
        );
    }

    #[test]
    pub fn it_exposes_the_data_files() {
        let tool = versioned(fastqc(), &versions()).pop().unwrap().unwrap();
        let outputs = tool.output_parameters();
        assert_eq!(outputs[1].tag, "datafile");
        assert_eq!(outputs[1].parameter_type.to_string(), "Array<TextFile>");
    }
}
