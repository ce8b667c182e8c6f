//! HTSlib utilities: `bgzip` and `tabix`.
//!
//! Link: http://www.htslib.org/doc/

use crate::tool::{
    CommandToolBuilder, Selector, Tool, ToolArgument, ToolInput, ToolMetadata, ToolOutput,
    VersionInfo,
};
use crate::tools::{versioned, MAINTAINERS};
use crate::types::variants::{CompressedVcf, Vcf, VcfTabix};
use crate::types::Type;

/// The HTSlib releases the definitions are published for.
pub fn versions() -> Vec<VersionInfo> {
    vec![
        VersionInfo::new("1.2.1", "biodckrdev/htslib:1.2.1"),
        VersionInfo::new("1.9", "quay.io/biocontainers/htslib:1.9--ha228f0b_7"),
    ]
}

pub(crate) fn definitions() -> Vec<anyhow::Result<Tool>> {
    let versions = versions();
    [bgzip(), tabix()]
        .into_iter()
        .flat_map(|builder| versioned(builder, &versions))
        .collect()
}

fn metadata() -> ToolMetadata {
    ToolMetadata::new()
        .contributor(MAINTAINERS)
        .institution("htslib")
        .doi("http://www.ncbi.nlm.nih.gov/pubmed/20980417")
        .keywords(["htslib"])
}

fn bgzip() -> CommandToolBuilder {
    CommandToolBuilder::new("BGZip")
        .friendly_name("BGZip")
        .tool_provider("HTSLib")
        .base_command(["bgzip"])
        .argument(ToolArgument::new("-c").position(2))
        .inputs([
            ToolInput::new("file", Type::file(Vcf)).position(100),
            ToolInput::new("offset", Type::Int.optional())
                .prefix("--offset")
                .position(3)
                .doc("Decompress to standard output from virtual file position (0-based uncompressed offset)."),
            ToolInput::new("decompress", Type::Boolean.optional())
                .prefix("--decompress")
                .position(3)
                .doc("Decompress."),
            ToolInput::new("force", Type::Boolean.optional())
                .prefix("--force")
                .position(3)
                .doc("Overwrite files without asking."),
            ToolInput::new("index", Type::Boolean.optional())
                .prefix("--index")
                .position(3)
                .doc("Create BGZF index."),
            ToolInput::new("compress", Type::Int.optional())
                .prefix("--compress-level")
                .position(3)
                .doc("Compression level to use when compressing. From 0 to 9, or -1 for the default level set by the compression library. [-1]"),
            ToolInput::new("threads", Type::Int.optional())
                .prefix("--threads")
                .position(3)
                .doc("Number of threads to use [1]."),
        ])
        .output(ToolOutput::new(
            "out",
            Type::stdout(CompressedVcf),
            Selector::Stdout,
        ))
        .metadata(
            metadata()
                .dates((2018, 12, 24), (2019, 1, 24))
                .documentation(
                    "bgzip - Block compression/decompression utility. Bgzip compresses files in a \
                    similar manner to, and compatible with, gzip. The file is compressed into a \
                    series of small (less than 64K) 'BGZF' blocks. This allows indexes to be \
                    built against the compressed file and used to retrieve portions of the data \
                    without having to decompress the entire file.",
                )
                .documentation_url("http://www.htslib.org/doc/bgzip.html"),
        )
}

fn tabix() -> CommandToolBuilder {
    CommandToolBuilder::new("Tabix")
        .friendly_name("Tabix")
        .tool_provider("HTSLib")
        .base_command(["tabix"])
        .inputs([
            ToolInput::new("inp", Type::file(CompressedVcf)).position(8),
            ToolInput::new("preset", Type::String.optional())
                .prefix("--preset")
                .position(2)
                .default("vcf")
                .doc("Input format for indexing. Valid values are: gff, bed, sam, vcf."),
            ToolInput::new("zeroBased", Type::Boolean.optional())
                .prefix("--zero-based")
                .position(1)
                .doc("Specify that the position in the data file is 0-based half-open (e.g. UCSC files)."),
            ToolInput::new("sequence", Type::Int.optional())
                .prefix("--sequence")
                .position(1)
                .doc("Column of sequence name. Option -s, -b, -e, -S, -c and -0 are all stored in the index file."),
            ToolInput::new("begin", Type::Int.optional())
                .prefix("--begin")
                .position(4)
                .doc("Column of start chromosomal position."),
            ToolInput::new("end", Type::Int.optional())
                .prefix("--end")
                .position(5)
                .doc("Column of end chromosomal position."),
            ToolInput::new("comment", Type::String.optional())
                .prefix("--comment")
                .position(7)
                .doc("Skip lines started with character CHAR. [#]"),
            ToolInput::new("skipLines", Type::Int.optional())
                .prefix("--skip-lines")
                .position(1)
                .doc("Skip first INT lines in the data file. [0]"),
            ToolInput::new("csi", Type::Boolean.optional())
                .prefix("--csi")
                .position(1)
                .doc("Produce CSI format index instead of classical tabix or BAI style indices."),
            ToolInput::new("force", Type::Boolean.optional())
                .prefix("--force")
                .position(1)
                .doc("Force to overwrite the index file if it is present."),
        ])
        .output(ToolOutput::new(
            "out",
            Type::file(VcfTabix),
            Selector::Input("inp".into()),
        ))
        .metadata(
            metadata()
                .dates((2018, 12, 24), (2019, 1, 24))
                .documentation(
                    "Tabix indexes a TAB-delimited genome position file in.tab.bgz and creates an \
                    index file (in.tab.bgz.tbi or in.tab.bgz.csi) when region is absent from the \
                    command-line. The input data file must be position sorted and compressed by \
                    bgzip which has a gzip(1) like interface.",
                )
                .documentation_url("http://www.htslib.org/doc/tabix.html"),
        )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tool::InputValues;

    #[test]
    pub fn it_compresses_to_standard_out() {
        let tool = versioned(bgzip(), &versions()).remove(0).unwrap();
        let values: InputValues =
            serde_json::from_value(json!({ "file": "calls.vcf", "threads": 2 })).unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().to_string(),
            "bgzip -c --threads 2 calls.vcf"
        );
        assert_eq!(tool.output_parameters()[0].parameter_type.to_string(), "Stdout<CompressedVCF>");
    }

    #[test]
    pub fn it_indexes_with_the_vcf_preset() {
        let tool = versioned(tabix(), &versions()).remove(0).unwrap();
        let values: InputValues =
            serde_json::from_value(json!({ "inp": "calls.vcf.gz" })).unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().to_string(),
            "tabix --preset vcf calls.vcf.gz"
        );
    }
}
