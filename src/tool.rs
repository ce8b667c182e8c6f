//! Tool definitions: how an external command-line program (or a native code
//! transform) is invoked, what it takes and what it produces.
//!
//! # Overview
//!
//! Every definition is assembled from two halves:
//!
//! * A [`CommandToolBuilder`] holding everything that does not change between
//!   releases of a tool: the base command, the inputs, the outputs, the
//!   documentation.
//! * A [`VersionInfo`] holding the version string and the container image
//!   that version is published in.
//!
//! A provider combines one builder with each [`VersionInfo`] it supports; the
//! result of [`CommandToolBuilder::build`] is a validated [`CommandTool`].
//!
//! ```
//! use biowrap::tool::{CommandToolBuilder, Selector, ToolInput, ToolOutput, VersionInfo};
//! use biowrap::types::alignment::Bam;
//! use biowrap::types::Type;
//!
//! let tool = CommandToolBuilder::new("SamToolsIndex")
//!     .base_command(["samtools", "index"])
//!     .input(ToolInput::new("bam", Type::file(Bam)).position(1))
//!     .output(ToolOutput::new("out", Type::file(Bam), Selector::Input("bam".into())))
//!     .version(VersionInfo::new("1.9.0", "biocontainers/samtools:v1.9-4-deb_cv1"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(tool.id(), "SamToolsIndex");
//! ```

pub mod command_line;
pub mod metadata;
pub mod schema;

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use anyhow::bail;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::types::Type;
use crate::utils::pathbuf::secondary_file_path;
use crate::workflow::Workflow;

pub use self::command_line::CommandLine;
pub use self::metadata::ToolMetadata;

/// Values supplied for a tool's inputs, keyed by input tag.
pub type InputValues = IndexMap<String, Value>;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap();
}

/// Checks that a tool or workflow identifier is made of ASCII letters, digits
/// and underscores, starting with a letter.
pub fn validate_identifier(kind: &str, id: &str) -> anyhow::Result<()> {
    if !IDENTIFIER.is_match(id) {
        bail!(
            "invalid {} identifier \"{}\": identifiers must start with a letter and \
            contain only letters, digits and underscores",
            kind,
            id
        );
    }

    Ok(())
}

//==============//
// Version info //
//==============//

/// The parts of a tool definition that vary between releases of the tool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    /// The version of the tool.
    pub version: String,

    /// The container image that holds this version of the tool.
    pub container: String,
}

impl VersionInfo {
    /// Creates a new [`VersionInfo`].
    pub fn new(version: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            container: container.into(),
        }
    }
}

/// Default compute resources for a tool.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Resources {
    /// Number of CPUs.
    pub cpus: Option<u32>,

    /// Memory in gigabytes.
    pub memory_gb: Option<f64>,
}

//========//
// Inputs //
//========//

/// A parameter of a tool. An input is placed on the command line only when it
/// has a prefix or a position; otherwise it only exists to be referenced
/// (e.g. by an output selector or a generated filename).
#[derive(Clone, Debug)]
pub struct ToolInput {
    /// The tag the input is referred to by.
    pub tag: String,

    /// The type of the input.
    pub input_type: Type,

    /// The command-line flag placed before the value.
    pub prefix: Option<String>,

    /// The position of the input on the command line.
    pub position: Option<i32>,

    /// Whether the prefix and the value are separate tokens (`-o x`) or one
    /// token (`-ox`, `--out=x`).
    pub separate_value_from_prefix: bool,

    /// For arrays, whether the prefix is repeated before every element.
    pub prefix_applies_to_all_elements: bool,

    /// For arrays, the separator the elements are joined with into a single
    /// token.
    pub separator: Option<String>,

    /// The value used when none is supplied.
    pub default: Option<Value>,

    /// Documentation for the input.
    pub doc: Option<String>,
}

impl ToolInput {
    /// Creates a new [`ToolInput`] that is not bound to the command line.
    pub fn new(tag: impl Into<String>, input_type: Type) -> Self {
        Self {
            tag: tag.into(),
            input_type,
            prefix: None,
            position: None,
            separate_value_from_prefix: true,
            prefix_applies_to_all_elements: false,
            separator: None,
            default: None,
            doc: None,
        }
    }

    /// Sets the command-line prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the position on the command line.
    pub fn position(mut self, position: i32) -> Self {
        self.position = Some(position);
        self
    }

    /// Joins the prefix and the value into a single token.
    pub fn joined(mut self) -> Self {
        self.separate_value_from_prefix = false;
        self
    }

    /// Repeats the prefix before every array element.
    pub fn prefix_each(mut self) -> Self {
        self.prefix_applies_to_all_elements = true;
        self
    }

    /// Joins array elements with the separator.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Sets the default value.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the documentation.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Whether the input is placed on the command line.
    pub fn is_bound(&self) -> bool {
        self.prefix.is_some() || self.position.is_some()
    }
}

/// A fixed argument that is always placed on the command line.
#[derive(Clone, Debug)]
pub struct ToolArgument {
    /// The value of the argument.
    pub value: String,

    /// The command-line flag placed before the value.
    pub prefix: Option<String>,

    /// The position of the argument on the command line.
    pub position: Option<i32>,

    /// Whether the prefix and the value are separate tokens.
    pub separate_value_from_prefix: bool,

    /// Documentation for the argument.
    pub doc: Option<String>,
}

impl ToolArgument {
    /// Creates a new [`ToolArgument`].
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            prefix: None,
            position: None,
            separate_value_from_prefix: true,
            doc: None,
        }
    }

    /// Sets the command-line prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the position on the command line.
    pub fn position(mut self, position: i32) -> Self {
        self.position = Some(position);
        self
    }

    /// Joins the prefix and the value into a single token.
    pub fn joined(mut self) -> Self {
        self.separate_value_from_prefix = false;
        self
    }

    /// Sets the documentation.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

//=========//
// Outputs //
//=========//

/// Where an output is found once the tool has run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selector {
    /// The path held by the given input (usually a [`Type::Filename`]).
    Input(String),

    /// The files matching the glob, relative to the working directory.
    Wildcard(String),

    /// Whatever the tool writes to standard out.
    Stdout,
}

/// An output of a tool.
#[derive(Clone, Debug)]
pub struct ToolOutput {
    /// The tag the output is referred to by.
    pub tag: String,

    /// The type of the output.
    pub output_type: Type,

    /// Where the output is found.
    pub selector: Selector,

    /// Secondary file patterns of the output type that this tool writes
    /// under a different pattern, e.g. `.bai` written as `^.bai`.
    pub secondaries_present_as: IndexMap<String, String>,

    /// Documentation for the output.
    pub doc: Option<String>,
}

impl ToolOutput {
    /// Creates a new [`ToolOutput`].
    pub fn new(tag: impl Into<String>, output_type: Type, selector: Selector) -> Self {
        Self {
            tag: tag.into(),
            output_type,
            selector,
            secondaries_present_as: IndexMap::new(),
            doc: None,
        }
    }

    /// Declares that the secondary file `pattern` of the output type is
    /// written as `present_as` by this tool.
    pub fn secondaries_present_as(
        mut self,
        pattern: impl Into<String>,
        present_as: impl Into<String>,
    ) -> Self {
        self.secondaries_present_as
            .insert(pattern.into(), present_as.into());
        self
    }

    /// The secondary file patterns of the output, as the tool writes them.
    pub fn secondary_files(&self) -> Vec<&str> {
        let patterns = match self.output_type.data_type() {
            Some(data_type) => data_type.secondary_files(),
            None => return Vec::new(),
        };

        patterns
            .iter()
            .map(|pattern| {
                self.secondaries_present_as
                    .get(*pattern)
                    .map(String::as_str)
                    .unwrap_or(*pattern)
            })
            .collect()
    }

    /// Resolves the paths of the secondary files the tool writes next to the
    /// output at `path`.
    pub fn secondary_file_paths(&self, path: &Path) -> anyhow::Result<Vec<PathBuf>> {
        self.secondary_files()
            .into_iter()
            .map(|pattern| secondary_file_path(path, pattern))
            .collect()
    }

    /// Sets the documentation.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

//===============//
// Command tools //
//===============//

/// A validated definition of an external command-line tool at one version.
#[derive(Clone, Debug)]
pub struct CommandTool {
    id: String,
    friendly_name: Option<String>,
    tool_provider: Option<String>,
    version: VersionInfo,
    base_command: Vec<String>,
    arguments: Vec<ToolArgument>,
    inputs: Vec<ToolInput>,
    outputs: Vec<ToolOutput>,
    resources: Resources,
    metadata: ToolMetadata,
}

impl CommandTool {
    /// The identifier of the tool.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// A human-friendly name for the tool, defaulting to the identifier.
    pub fn friendly_name(&self) -> &str {
        self.friendly_name.as_deref().unwrap_or(&self.id)
    }

    /// The group of tools this one belongs to (e.g. `Samtools`).
    pub fn tool_provider(&self) -> Option<&str> {
        self.tool_provider.as_deref()
    }

    /// The version of the tool.
    pub fn version(&self) -> &str {
        &self.version.version
    }

    /// The container image the tool runs in.
    pub fn container(&self) -> &str {
        &self.version.container
    }

    /// The command that precedes every argument.
    pub fn base_command(&self) -> &[String] {
        &self.base_command
    }

    /// The fixed arguments.
    pub fn arguments(&self) -> &[ToolArgument] {
        &self.arguments
    }

    /// The inputs.
    pub fn inputs(&self) -> &[ToolInput] {
        &self.inputs
    }

    /// The outputs.
    pub fn outputs(&self) -> &[ToolOutput] {
        &self.outputs
    }

    /// Gets an input by tag.
    pub fn input(&self, tag: &str) -> Option<&ToolInput> {
        self.inputs.iter().find(|i| i.tag == tag)
    }

    /// Gets an output by tag.
    pub fn output(&self, tag: &str) -> Option<&ToolOutput> {
        self.outputs.iter().find(|o| o.tag == tag)
    }

    /// The default compute resources.
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// The metadata.
    pub fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    /// Renders the command line this tool would be invoked with for the given
    /// input values.
    pub fn command_line(&self, values: &InputValues) -> anyhow::Result<CommandLine> {
        command_line::render(
            &self.base_command,
            &self.arguments,
            &self.inputs,
            values,
        )
    }
}

/// Builds a [`CommandTool`]. The builder is cheap to clone so that one builder
/// can be combined with several [`VersionInfo`]s.
#[derive(Clone, Debug, Default)]
pub struct CommandToolBuilder {
    id: String,
    friendly_name: Option<String>,
    tool_provider: Option<String>,
    version: Option<VersionInfo>,
    base_command: Vec<String>,
    arguments: Vec<ToolArgument>,
    inputs: Vec<ToolInput>,
    outputs: Vec<ToolOutput>,
    resources: Resources,
    metadata: ToolMetadata,
}

impl CommandToolBuilder {
    /// Creates a new [`CommandToolBuilder`] for the tool with the given
    /// identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Sets the friendly name.
    pub fn friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Sets the tool provider.
    pub fn tool_provider(mut self, provider: impl Into<String>) -> Self {
        self.tool_provider = Some(provider.into());
        self
    }

    /// Sets the base command.
    pub fn base_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_command = command.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a fixed argument.
    pub fn argument(mut self, argument: ToolArgument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Adds an input.
    pub fn input(mut self, input: ToolInput) -> Self {
        self.inputs.push(input);
        self
    }

    /// Adds several inputs.
    pub fn inputs(mut self, inputs: impl IntoIterator<Item = ToolInput>) -> Self {
        self.inputs.extend(inputs);
        self
    }

    /// Adds an output.
    pub fn output(mut self, output: ToolOutput) -> Self {
        self.outputs.push(output);
        self
    }

    /// Adds several outputs.
    pub fn outputs(mut self, outputs: impl IntoIterator<Item = ToolOutput>) -> Self {
        self.outputs.extend(outputs);
        self
    }

    /// Sets the default number of CPUs.
    pub fn cpus(mut self, cpus: u32) -> Self {
        self.resources.cpus = Some(cpus);
        self
    }

    /// Sets the default memory in gigabytes.
    pub fn memory_gb(mut self, memory_gb: f64) -> Self {
        self.resources.memory_gb = Some(memory_gb);
        self
    }

    /// Sets the metadata.
    pub fn metadata(mut self, metadata: ToolMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Sets the version and container.
    pub fn version(mut self, version: VersionInfo) -> Self {
        self.version = Some(version);
        self
    }

    /// Validates the definition and builds the [`CommandTool`].
    pub fn build(self) -> anyhow::Result<CommandTool> {
        validate_identifier("tool", &self.id)?;

        let version = match self.version {
            Some(v) => v,
            None => bail!("tool {} does not declare a version", self.id),
        };

        if version.version.trim().is_empty() {
            bail!("tool {} declares an empty version", self.id);
        }

        if version.container.trim().is_empty() {
            bail!(
                "tool {} (version {}) does not declare a container",
                self.id,
                version.version
            );
        }

        if self.base_command.is_empty() {
            bail!("tool {} does not declare a base command", self.id);
        }

        validate_parameters(&self.id, &self.inputs, &self.outputs)?;

        Ok(CommandTool {
            id: self.id,
            friendly_name: self.friendly_name,
            tool_provider: self.tool_provider,
            version,
            base_command: self.base_command,
            arguments: self.arguments,
            inputs: self.inputs,
            outputs: self.outputs,
            resources: self.resources,
            metadata: self.metadata,
        })
    }
}

/// Checks the inputs and outputs of a tool for duplicate tags, dangling
/// references and badly typed defaults.
fn validate_parameters(id: &str, inputs: &[ToolInput], outputs: &[ToolOutput]) -> anyhow::Result<()> {
    let mut input_tags = HashSet::new();
    for input in inputs {
        if !input_tags.insert(input.tag.as_str()) {
            bail!("tool {} declares the input {} more than once", id, input.tag);
        }
    }

    for input in inputs {
        if let Some(default) = &input.default {
            if !input.input_type.accepts(default) {
                bail!(
                    "tool {}: default {} of input {} is not a valid {}",
                    id,
                    default,
                    input.tag,
                    input.input_type
                );
            }
        }

        if let Type::Filename(filename) = input.input_type.non_optional() {
            if let Some(prefix) = &filename.prefix {
                if !input_tags.contains(prefix.as_str()) {
                    bail!(
                        "tool {}: filename input {} is prefixed by unknown input {}",
                        id,
                        input.tag,
                        prefix
                    );
                }
            }
        }
    }

    let mut output_tags = HashSet::new();
    for output in outputs {
        if !output_tags.insert(output.tag.as_str()) {
            bail!("tool {} declares the output {} more than once", id, output.tag);
        }

        let declared = output
            .output_type
            .data_type()
            .map(|t| t.secondary_files())
            .unwrap_or_default();
        for pattern in output.secondaries_present_as.keys() {
            if !declared.iter().any(|d| *d == pattern.as_str()) {
                bail!(
                    "tool {}: output {} renames secondary file {}, which its type {} does not have",
                    id,
                    output.tag,
                    pattern,
                    output.output_type
                );
            }
        }

        if let Selector::Input(tag) = &output.selector {
            if !input_tags.contains(tag.as_str()) {
                bail!(
                    "tool {}: output {} selects unknown input {}",
                    id,
                    output.tag,
                    tag
                );
            }
        }
    }

    Ok(())
}

//============//
// Code tools //
//============//

/// The native implementation of a code tool: takes the resolved input values
/// and returns a JSON object keyed by output tag.
pub type CodeFn = fn(&InputValues) -> anyhow::Result<Value>;

/// A tool implemented in `biowrap` itself. Inside its container, the tool is
/// invoked through the `biowrap` binary (the wrapped [`CommandTool`]), and it
/// can also be run in-process with [`CodeTool::run`].
#[derive(Clone, Debug)]
pub struct CodeTool {
    command: CommandTool,
    run: CodeFn,
}

impl CodeTool {
    /// Creates a new [`CodeTool`].
    pub fn new(command: CommandTool, run: CodeFn) -> Self {
        Self { command, run }
    }

    /// The command-line form of the tool.
    pub fn command(&self) -> &CommandTool {
        &self.command
    }

    /// Runs the tool in-process. Defaults are filled in and the values are
    /// checked against the declared inputs first.
    pub fn run(&self, values: &InputValues) -> anyhow::Result<Value> {
        let resolved = command_line::resolve_values(self.command.inputs(), values)?;
        (self.run)(&resolved)
    }
}

//=======//
// Tools //
//=======//

/// The kinds of definitions held by the tool registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ToolKind {
    /// A wrapper around an external command-line program.
    CommandTool,

    /// A transform implemented in `biowrap`.
    CodeTool,

    /// A composition of other tools.
    Workflow,
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CommandTool => write!(f, "CommandTool"),
            Self::CodeTool => write!(f, "CodeTool"),
            Self::Workflow => write!(f, "Workflow"),
        }
    }
}

/// A borrowed view of an input or output of any kind of tool, used when
/// connecting tools together.
#[derive(Debug)]
pub struct Parameter<'a> {
    /// The tag of the parameter.
    pub tag: &'a str,

    /// The type of the parameter.
    pub parameter_type: &'a Type,

    /// Whether the parameter has a default (or generated) value.
    pub has_default: bool,
}

impl Parameter<'_> {
    /// Whether a value must be supplied for this parameter.
    pub fn is_required(&self) -> bool {
        !self.has_default && !self.parameter_type.is_optional()
    }
}

/// Any definition that can be registered in the tool registry.
#[derive(Clone, Debug)]
pub enum Tool {
    /// A wrapper around an external command-line program.
    Command(CommandTool),

    /// A transform implemented in `biowrap`.
    Code(CodeTool),

    /// A composition of other tools.
    Workflow(Workflow),
}

impl Tool {
    /// The identifier of the tool.
    pub fn id(&self) -> &str {
        match self {
            Tool::Command(tool) => tool.id(),
            Tool::Code(tool) => tool.command().id(),
            Tool::Workflow(workflow) => workflow.id(),
        }
    }

    /// The version of the tool.
    pub fn version(&self) -> &str {
        match self {
            Tool::Command(tool) => tool.version(),
            Tool::Code(tool) => tool.command().version(),
            Tool::Workflow(workflow) => workflow.version(),
        }
    }

    /// The kind of the tool.
    pub fn kind(&self) -> ToolKind {
        match self {
            Tool::Command(_) => ToolKind::CommandTool,
            Tool::Code(_) => ToolKind::CodeTool,
            Tool::Workflow(_) => ToolKind::Workflow,
        }
    }

    /// A human-friendly name for the tool.
    pub fn friendly_name(&self) -> &str {
        match self {
            Tool::Command(tool) => tool.friendly_name(),
            Tool::Code(tool) => tool.command().friendly_name(),
            Tool::Workflow(workflow) => workflow.friendly_name(),
        }
    }

    /// The group of tools this one belongs to, if declared.
    pub fn tool_provider(&self) -> Option<&str> {
        match self {
            Tool::Command(tool) => tool.tool_provider(),
            Tool::Code(tool) => tool.command().tool_provider(),
            Tool::Workflow(_) => None,
        }
    }

    /// The container image, for tools that run in one.
    pub fn container(&self) -> Option<&str> {
        match self {
            Tool::Command(tool) => Some(tool.container()),
            Tool::Code(tool) => Some(tool.command().container()),
            Tool::Workflow(_) => None,
        }
    }

    /// The metadata of the tool.
    pub fn metadata(&self) -> &ToolMetadata {
        match self {
            Tool::Command(tool) => tool.metadata(),
            Tool::Code(tool) => tool.command().metadata(),
            Tool::Workflow(workflow) => workflow.metadata(),
        }
    }

    /// The inputs of the tool.
    pub fn input_parameters(&self) -> Vec<Parameter<'_>> {
        match self {
            Tool::Command(tool) => command_parameters(tool),
            Tool::Code(tool) => command_parameters(tool.command()),
            Tool::Workflow(workflow) => workflow
                .inputs()
                .iter()
                .map(|input| Parameter {
                    tag: &input.tag,
                    parameter_type: &input.input_type,
                    has_default: input.default.is_some(),
                })
                .collect(),
        }
    }

    /// The outputs of the tool.
    pub fn output_parameters(&self) -> Vec<Parameter<'_>> {
        let outputs = match self {
            Tool::Command(tool) => tool.outputs(),
            Tool::Code(tool) => tool.command().outputs(),
            Tool::Workflow(workflow) => {
                return workflow
                    .outputs()
                    .iter()
                    .map(|output| Parameter {
                        tag: &output.tag,
                        parameter_type: &output.output_type,
                        has_default: false,
                    })
                    .collect()
            }
        };

        outputs
            .iter()
            .map(|output| Parameter {
                tag: &output.tag,
                parameter_type: &output.output_type,
                has_default: false,
            })
            .collect()
    }

    /// Renders the command line for command and code tools. Workflows have no
    /// single command line.
    pub fn command_line(&self, values: &InputValues) -> anyhow::Result<CommandLine> {
        match self {
            Tool::Command(tool) => tool.command_line(values),
            Tool::Code(tool) => tool.command().command_line(values),
            Tool::Workflow(workflow) => bail!(
                "{} is a workflow; command lines can only be rendered for its steps",
                workflow.id()
            ),
        }
    }
}

fn command_parameters(tool: &CommandTool) -> Vec<Parameter<'_>> {
    tool.inputs()
        .iter()
        .map(|input| Parameter {
            tag: &input.tag,
            parameter_type: &input.input_type,
            has_default: input.default.is_some()
                || matches!(input.input_type.non_optional(), Type::Filename(_)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::alignment::{Bam, BamBai};
    use crate::types::Filename;

    fn builder() -> CommandToolBuilder {
        CommandToolBuilder::new("SamToolsSort")
            .base_command(["samtools", "sort"])
            .input(ToolInput::new("bam", Type::file(Bam)).position(10))
            .input(
                ToolInput::new(
                    "outputFilename",
                    Type::Filename(Filename::with_extension(".bam").prefix("bam")),
                )
                .prefix("-o"),
            )
            .output(ToolOutput::new(
                "out",
                Type::file(Bam),
                Selector::Input("outputFilename".into()),
            ))
    }

    #[test]
    fn it_builds_a_valid_tool() {
        let tool = builder()
            .version(VersionInfo::new("1.9.0", "biocontainers/samtools:v1.9-4-deb_cv1"))
            .build()
            .unwrap();

        assert_eq!(tool.version(), "1.9.0");
        assert_eq!(tool.friendly_name(), "SamToolsSort");
        assert!(tool.input("bam").is_some());
        assert!(tool.output("nope").is_none());
    }

    #[test]
    fn it_refuses_a_tool_without_a_version() {
        let err = builder().build().unwrap_err();
        assert!(err.to_string().contains("does not declare a version"));
    }

    #[test]
    fn it_refuses_a_tool_without_a_container() {
        let err = builder()
            .version(VersionInfo::new("1.9.0", " "))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("does not declare a container"));
    }

    #[test]
    fn it_refuses_bad_identifiers() {
        assert!(validate_identifier("tool", "9lives").is_err());
        assert!(validate_identifier("tool", "bad-name").is_err());
        assert!(validate_identifier("tool", "").is_err());
        assert!(validate_identifier("tool", "Gatk4SortSam_4_1").is_ok());
    }

    #[test]
    fn it_refuses_duplicate_inputs() {
        let err = builder()
            .input(ToolInput::new("bam", Type::String))
            .version(VersionInfo::new("1.9.0", "samtools"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("input bam more than once"));
    }

    #[test]
    fn it_refuses_selectors_of_unknown_inputs() {
        let err = builder()
            .output(ToolOutput::new(
                "missing",
                Type::file(Bam),
                Selector::Input("nope".into()),
            ))
            .version(VersionInfo::new("1.9.0", "samtools"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("selects unknown input nope"));
    }

    #[test]
    fn it_resolves_secondaries_written_under_another_pattern() {
        let plain = ToolOutput::new("out", Type::file(BamBai), Selector::Input("o".into()));
        assert_eq!(plain.secondary_files(), vec![".bai"]);
        assert_eq!(
            plain.secondary_file_paths(Path::new("x.sorted.bam")).unwrap(),
            vec![PathBuf::from("x.sorted.bam.bai")]
        );

        let picard = plain.secondaries_present_as(".bai", "^.bai");
        assert_eq!(picard.secondary_files(), vec!["^.bai"]);
        assert_eq!(
            picard.secondary_file_paths(Path::new("x.sorted.bam")).unwrap(),
            vec![PathBuf::from("x.sorted.bai")]
        );

        let text = ToolOutput::new("log", Type::String, Selector::Wildcard("*.log".into()));
        assert!(text.secondary_files().is_empty());
    }

    #[test]
    fn it_refuses_renaming_a_secondary_the_type_does_not_have() {
        let err = builder()
            .output(
                ToolOutput::new("index", Type::file(BamBai), Selector::Input("outputFilename".into()))
                    .secondaries_present_as(".crai", "^.crai"),
            )
            .version(VersionInfo::new("1.9.0", "samtools"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("renames secondary file .crai"));
    }

    #[test]
    fn it_refuses_badly_typed_defaults() {
        let err = builder()
            .input(ToolInput::new("threads", Type::Int).prefix("-@").default("four"))
            .version(VersionInfo::new("1.9.0", "samtools"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("is not a valid Int"));
    }

    #[test]
    fn it_counts_generated_filenames_as_defaulted() {
        let tool = Tool::Command(
            builder()
                .version(VersionInfo::new("1.9.0", "samtools"))
                .build()
                .unwrap(),
        );

        let required = tool
            .input_parameters()
            .into_iter()
            .filter(|p| p.is_required())
            .map(|p| p.tag)
            .collect::<Vec<_>>();
        assert_eq!(required, vec!["bam"]);
        assert_eq!(tool.kind(), ToolKind::CommandTool);
        assert_eq!(tool.container(), Some("samtools"));
    }

    #[test]
    fn it_runs_code_tools_with_resolved_defaults() {
        fn echo(values: &InputValues) -> anyhow::Result<Value> {
            Ok(json!({ "out": values["greeting"] }))
        }

        let command = CommandToolBuilder::new("Echo")
            .base_command(["biowrap", "echo"])
            .input(ToolInput::new("greeting", Type::String).default("hello"))
            .version(VersionInfo::new("0.1.0", "biowrap"))
            .build()
            .unwrap();
        let tool = CodeTool::new(command, echo);

        assert_eq!(tool.run(&InputValues::new()).unwrap(), json!({"out": "hello"}));
    }
}
