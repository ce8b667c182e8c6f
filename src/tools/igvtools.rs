//! igvtools: utilities for preprocessing files for IGV.
//!
//! Link: https://software.broadinstitute.org/software/igv/igvtools_commandline

use crate::tool::{
    CommandToolBuilder, Selector, Tool, ToolInput, ToolMetadata, ToolOutput, VersionInfo,
};
use crate::tools::{versioned, MAINTAINERS};
use crate::types::variants::{IndexedVcf, Vcf};
use crate::types::Type;

/// The igvtools releases the definitions are published for.
pub fn versions() -> Vec<VersionInfo> {
    vec![VersionInfo::new("2.5.3", "quay.io/biocontainers/igvtools:2.5.3--0")]
}

pub(crate) fn definitions() -> Vec<anyhow::Result<Tool>> {
    versioned(index(), &versions())
}

fn index() -> CommandToolBuilder {
    CommandToolBuilder::new("IgvIndexFeature")
        .friendly_name("IGVTools: Index")
        .tool_provider("IGVTools")
        .base_command(["igvtools", "index"])
        .input(ToolInput::new("inp", Type::file(Vcf)).position(1))
        .output(
            ToolOutput::new("out", Type::file(IndexedVcf), Selector::Input("inp".into()))
                .doc("The VCF with its .idx index alongside."),
        )
        .metadata(
            ToolMetadata::new()
                .contributor(MAINTAINERS)
                .dates((2019, 12, 17), (2019, 12, 17))
                .institution("Broad Institute")
                .keywords(["igv", "index"])
                .documentation(
                    "Creates an index for an alignment or feature file. Index files are required \
                    for loading alignment files into IGV, and can significantly improve \
                    performance for large feature files. The index is written next to the input \
                    with an .idx extension.",
                )
                .documentation_url(
                    "https://software.broadinstitute.org/software/igv/igvtools_commandline",
                ),
        )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tool::InputValues;
    use crate::types::DataType;

    #[test]
    pub fn it_indexes_next_to_the_input() {
        let tool = versioned(index(), &versions()).remove(0).unwrap();
        let values: InputValues = serde_json::from_value(json!({ "inp": "calls.vcf" })).unwrap();

        assert_eq!(
            tool.command_line(&values).unwrap().to_string(),
            "igvtools index calls.vcf"
        );
        assert_eq!(IndexedVcf.secondary_files(), &[".idx"]);
    }
}
