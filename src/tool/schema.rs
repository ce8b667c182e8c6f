//! A serializable description of a registered tool, as printed by
//! `biowrap describe`.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::tool::{CommandTool, Resources, Selector, Tool, ToolKind, ToolMetadata};
use crate::types::Type;
use crate::workflow::Source;

/// The full description of a tool or workflow.
#[derive(Debug, Serialize)]
pub struct ToolSchema<'a> {
    /// The identifier.
    pub id: &'a str,

    /// The kind of definition.
    pub kind: ToolKind,

    /// The friendly name.
    pub friendly_name: &'a str,

    /// The tool provider, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_provider: Option<&'a str>,

    /// The version.
    pub version: &'a str,

    /// The container image, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<&'a str>,

    /// The base command, for command and code tools.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_command: Option<&'a [String]>,

    /// The fixed arguments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentSchema<'a>>,

    /// The inputs.
    pub inputs: Vec<ParameterSchema<'a>>,

    /// The outputs.
    pub outputs: Vec<ParameterSchema<'a>>,

    /// The steps, for workflows.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepSchema<'a>>,

    /// The default resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<&'a Resources>,

    /// The metadata.
    pub metadata: &'a ToolMetadata,
}

/// The description of a fixed argument.
#[derive(Debug, Serialize)]
pub struct ArgumentSchema<'a> {
    /// The value.
    pub value: &'a str,

    /// The prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<&'a str>,

    /// The position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

/// The description of an input or output.
#[derive(Debug, Serialize)]
pub struct ParameterSchema<'a> {
    /// The tag.
    pub tag: &'a str,

    /// The type, as displayed.
    #[serde(rename = "type")]
    pub parameter_type: String,

    /// Whether a value may be omitted.
    pub optional: bool,

    /// The secondary files of the type, if it holds files.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secondary_files: Vec<&'a str>,

    /// Secondary file patterns that the tool writes under another pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondaries_present_as: Option<&'a IndexMap<String, String>>,

    /// The command-line prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<&'a str>,

    /// The command-line position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,

    /// The default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'a Value>,

    /// Where an output is found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<&'a Selector>,

    /// Documentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<&'a str>,
}

impl<'a> ParameterSchema<'a> {
    fn new(tag: &'a str, parameter_type: &'a Type) -> Self {
        Self {
            tag,
            parameter_type: parameter_type.to_string(),
            optional: parameter_type.is_optional(),
            secondary_files: parameter_type
                .data_type()
                .map(|t| t.secondary_files().to_vec())
                .unwrap_or_default(),
            secondaries_present_as: None,
            prefix: None,
            position: None,
            default: None,
            selector: None,
            doc: None,
        }
    }
}

/// The description of a workflow step.
#[derive(Debug, Serialize)]
pub struct StepSchema<'a> {
    /// The step identifier.
    pub id: &'a str,

    /// The tool the step runs.
    pub tool: &'a str,

    /// The resolved version of the tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_version: Option<&'a str>,

    /// The connections, keyed by tool input.
    pub sources: Vec<(&'a str, &'a Source)>,
}

fn command_schema<'a>(tool: &'a CommandTool, kind: ToolKind) -> ToolSchema<'a> {
    ToolSchema {
        id: tool.id(),
        kind,
        friendly_name: tool.friendly_name(),
        tool_provider: tool.tool_provider(),
        version: tool.version(),
        container: Some(tool.container()),
        base_command: Some(tool.base_command()),
        arguments: tool
            .arguments()
            .iter()
            .map(|a| ArgumentSchema {
                value: &a.value,
                prefix: a.prefix.as_deref(),
                position: a.position,
            })
            .collect(),
        inputs: tool
            .inputs()
            .iter()
            .map(|i| ParameterSchema {
                prefix: i.prefix.as_deref(),
                position: i.position,
                default: i.default.as_ref(),
                doc: i.doc.as_deref(),
                ..ParameterSchema::new(&i.tag, &i.input_type)
            })
            .collect(),
        outputs: tool
            .outputs()
            .iter()
            .map(|o| ParameterSchema {
                secondary_files: o.secondary_files(),
                secondaries_present_as: Some(&o.secondaries_present_as)
                    .filter(|renamed| !renamed.is_empty()),
                selector: Some(&o.selector),
                doc: o.doc.as_deref(),
                ..ParameterSchema::new(&o.tag, &o.output_type)
            })
            .collect(),
        steps: Vec::new(),
        resources: Some(tool.resources()),
        metadata: tool.metadata(),
    }
}

impl Tool {
    /// Describes the tool in a serializable form.
    pub fn schema(&self) -> ToolSchema<'_> {
        match self {
            Tool::Command(tool) => command_schema(tool, ToolKind::CommandTool),
            Tool::Code(tool) => command_schema(tool.command(), ToolKind::CodeTool),
            Tool::Workflow(workflow) => ToolSchema {
                id: workflow.id(),
                kind: ToolKind::Workflow,
                friendly_name: workflow.friendly_name(),
                tool_provider: None,
                version: workflow.version(),
                container: None,
                base_command: None,
                arguments: Vec::new(),
                inputs: workflow
                    .inputs()
                    .iter()
                    .map(|i| ParameterSchema {
                        default: i.default.as_ref(),
                        doc: i.doc.as_deref(),
                        ..ParameterSchema::new(&i.tag, &i.input_type)
                    })
                    .collect(),
                outputs: workflow
                    .outputs()
                    .iter()
                    .map(|o| ParameterSchema::new(&o.tag, &o.output_type))
                    .collect(),
                steps: workflow
                    .steps()
                    .iter()
                    .map(|s| StepSchema {
                        id: &s.id,
                        tool: &s.tool,
                        tool_version: s.tool_version.as_deref(),
                        sources: s.sources.iter().map(|(k, v)| (k.as_str(), v)).collect(),
                    })
                    .collect(),
                resources: None,
                metadata: workflow.metadata(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::tool::{CommandToolBuilder, Selector, Tool, ToolInput, ToolOutput, VersionInfo};
    use crate::types::alignment::BamBai;
    use crate::types::Type;

    #[test]
    fn it_describes_a_command_tool_as_json() {
        let tool = Tool::Command(
            CommandToolBuilder::new("Index")
                .tool_provider("Samtools")
                .base_command(["samtools", "index"])
                .input(ToolInput::new("bam", Type::file(BamBai)).position(1))
                .output(ToolOutput::new(
                    "out",
                    Type::file(BamBai),
                    Selector::Input("bam".into()),
                ))
                .version(VersionInfo::new("1.9.0", "samtools"))
                .build()
                .unwrap(),
        );

        let value = serde_json::to_value(tool.schema()).unwrap();
        assert_eq!(value["kind"], json!("CommandTool"));
        assert_eq!(value["inputs"][0]["type"], json!("BamBai"));
        assert_eq!(value["inputs"][0]["secondary_files"], json!([".bai"]));
        assert_eq!(
            value["outputs"][0]["selector"],
            json!({"kind": "input", "value": "bam"})
        );
        assert!(value.get("steps").is_none());
        assert!(value["outputs"][0].get("secondaries_present_as").is_none());
    }

    #[test]
    fn it_shows_secondaries_written_under_another_pattern() {
        let tool = Tool::Command(
            CommandToolBuilder::new("SortSam")
                .base_command(["picard", "SortSam"])
                .input(ToolInput::new("bam", Type::file(BamBai)).position(1))
                .output(
                    ToolOutput::new("out", Type::file(BamBai), Selector::Input("bam".into()))
                        .secondaries_present_as(".bai", "^.bai"),
                )
                .version(VersionInfo::new("4.1.3.0", "broadinstitute/gatk:4.1.3.0"))
                .build()
                .unwrap(),
        );

        let value = serde_json::to_value(tool.schema()).unwrap();
        assert_eq!(value["inputs"][0]["secondary_files"], json!([".bai"]));
        assert_eq!(value["outputs"][0]["secondary_files"], json!(["^.bai"]));
        assert_eq!(
            value["outputs"][0]["secondaries_present_as"],
            json!({".bai": "^.bai"})
        );
    }
}
