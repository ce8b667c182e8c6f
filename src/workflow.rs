//! Workflows: tools from the catalog connected into a pipeline.
//!
//! A workflow is validated against the tools it uses when it is built: every
//! step must reference a known tool, every connection must be type-compatible,
//! and every required input of every step must be connected. Steps may only
//! consume the outputs of steps declared before them, so a built workflow is
//! always acyclic.

use std::collections::HashMap;
use std::collections::HashSet;

use anyhow::bail;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::tool::validate_identifier;
use crate::tool::Tool;
use crate::tool::ToolMetadata;
use crate::types::Type;

/// Something tools can be looked up in while a workflow is built.
pub trait ToolLookup {
    /// Finds a tool by identifier and, optionally, version. Without a version,
    /// the implementation picks its default version.
    fn find_tool(&self, id: &str, version: Option<&str>) -> Option<&Tool>;
}

//========//
// Inputs //
//========//

/// An input of a workflow.
#[derive(Clone, Debug)]
pub struct WorkflowInput {
    /// The tag the input is referred to by.
    pub tag: String,

    /// The type of the input.
    pub input_type: Type,

    /// The value used when none is supplied.
    pub default: Option<Value>,

    /// Documentation for the input.
    pub doc: Option<String>,
}

//=========//
// Sources //
//=========//

/// Where the value connected to a step input comes from.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// An input of the workflow.
    Input(String),

    /// An output of an earlier step.
    Step {
        /// The identifier of the step.
        step: String,

        /// The tag of the output.
        output: String,
    },

    /// A fixed value.
    Value(Value),
}

impl Source {
    /// Connects a workflow input.
    pub fn input(tag: impl Into<String>) -> Self {
        Source::Input(tag.into())
    }

    /// Connects the output of an earlier step.
    pub fn step(step: impl Into<String>, output: impl Into<String>) -> Self {
        Source::Step {
            step: step.into(),
            output: output.into(),
        }
    }

    /// Connects a fixed value.
    pub fn value(value: impl Into<Value>) -> Self {
        Source::Value(value.into())
    }
}

//=======//
// Steps //
//=======//

/// A tool invocation within a workflow.
#[derive(Clone, Debug)]
pub struct Step {
    /// The identifier of the step, unique within the workflow.
    pub id: String,

    /// The identifier of the tool the step runs.
    pub tool: String,

    /// The version of the tool. Filled in with the resolved version when the
    /// workflow is built.
    pub tool_version: Option<String>,

    /// The values connected to the tool's inputs, keyed by input tag.
    pub sources: IndexMap<String, Source>,

    /// Documentation for the step.
    pub doc: Option<String>,
}

impl Step {
    /// Creates a new [`Step`] running the default version of `tool`.
    pub fn new(id: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tool: tool.into(),
            tool_version: None,
            sources: IndexMap::new(),
            doc: None,
        }
    }

    /// Pins the version of the tool.
    pub fn tool_version(mut self, version: impl Into<String>) -> Self {
        self.tool_version = Some(version.into());
        self
    }

    /// Connects a source to one of the tool's inputs.
    pub fn source(mut self, tag: impl Into<String>, source: Source) -> Self {
        self.sources.insert(tag.into(), source);
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

/// An output of a workflow, taken from the output of one of its steps.
#[derive(Clone, Debug)]
pub struct WorkflowOutput {
    /// The tag the output is referred to by.
    pub tag: String,

    /// The type of the output, taken from the step output.
    pub output_type: Type,

    /// The step the output comes from.
    pub step: String,

    /// The tag of the step output.
    pub output: String,
}

//===========//
// Workflows //
//===========//

/// A validated workflow.
#[derive(Clone, Debug)]
pub struct Workflow {
    id: String,
    friendly_name: Option<String>,
    version: String,
    inputs: Vec<WorkflowInput>,
    steps: Vec<Step>,
    outputs: Vec<WorkflowOutput>,
    metadata: ToolMetadata,
}

impl Workflow {
    /// The identifier of the workflow.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// A human-friendly name for the workflow, defaulting to the identifier.
    pub fn friendly_name(&self) -> &str {
        self.friendly_name.as_deref().unwrap_or(&self.id)
    }

    /// The version of the workflow.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The inputs.
    pub fn inputs(&self) -> &[WorkflowInput] {
        &self.inputs
    }

    /// The steps, in declaration order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The outputs.
    pub fn outputs(&self) -> &[WorkflowOutput] {
        &self.outputs
    }

    /// The metadata.
    pub fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }
}

/// Builds a [`Workflow`].
#[derive(Clone, Debug, Default)]
pub struct WorkflowBuilder {
    id: String,
    friendly_name: Option<String>,
    version: String,
    inputs: Vec<WorkflowInput>,
    steps: Vec<Step>,
    outputs: Vec<(String, String, String)>,
    metadata: ToolMetadata,
}

impl WorkflowBuilder {
    /// Creates a new [`WorkflowBuilder`].
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    /// Sets the friendly name.
    pub fn friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Adds an input.
    pub fn input(mut self, tag: impl Into<String>, input_type: Type) -> Self {
        self.inputs.push(WorkflowInput {
            tag: tag.into(),
            input_type,
            default: None,
            doc: None,
        });
        self
    }

    /// Adds an input with a default value.
    pub fn input_with_default(
        mut self,
        tag: impl Into<String>,
        input_type: Type,
        default: impl Into<Value>,
    ) -> Self {
        self.inputs.push(WorkflowInput {
            tag: tag.into(),
            input_type,
            default: Some(default.into()),
            doc: None,
        });
        self
    }

    /// Adds a step.
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Exposes the output of a step as an output of the workflow.
    pub fn output(
        mut self,
        tag: impl Into<String>,
        step: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        self.outputs.push((tag.into(), step.into(), output.into()));
        self
    }

    /// Sets the metadata.
    pub fn metadata(mut self, metadata: ToolMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Validates the workflow against the tools in `lookup` and builds it.
    pub fn build(self, lookup: &dyn ToolLookup) -> anyhow::Result<Workflow> {
        validate_identifier("workflow", &self.id)?;

        if self.version.trim().is_empty() {
            bail!("workflow {} declares an empty version", self.id);
        }

        let mut input_types = HashMap::new();
        for input in &self.inputs {
            if let Some(default) = &input.default {
                if !input.input_type.accepts(default) {
                    bail!(
                        "workflow {}: default {} of input {} is not a valid {}",
                        self.id,
                        default,
                        input.tag,
                        input.input_type
                    );
                }
            }

            if input_types
                .insert(input.tag.as_str(), &input.input_type)
                .is_some()
            {
                bail!("workflow {} declares the input {} more than once", self.id, input.tag);
            }
        }

        let mut resolved: HashMap<&str, &Tool> = HashMap::new();
        let mut steps = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            if resolved.contains_key(step.id.as_str()) {
                bail!("workflow {} declares the step {} more than once", self.id, step.id);
            }

            let tool = match lookup.find_tool(&step.tool, step.tool_version.as_deref()) {
                Some(tool) => tool,
                None => bail!(
                    "workflow {}: step {} references unknown tool {}{}",
                    self.id,
                    step.id,
                    step.tool,
                    step.tool_version
                        .as_deref()
                        .map(|v| format!(" (version {})", v))
                        .unwrap_or_default()
                ),
            };

            let parameters = tool.input_parameters();
            for (tag, source) in &step.sources {
                let parameter = match parameters.iter().find(|p| p.tag == tag.as_str()) {
                    Some(p) => p,
                    None => bail!(
                        "workflow {}: step {} connects {} but {} has no such input",
                        self.id,
                        step.id,
                        tag,
                        tool.id()
                    ),
                };

                let compatible = match source {
                    Source::Input(input) => match input_types.get(input.as_str()) {
                        Some(t) => parameter.parameter_type.receives(t),
                        None => bail!(
                            "workflow {}: step {} connects unknown workflow input {}",
                            self.id,
                            step.id,
                            input
                        ),
                    },
                    Source::Step {
                        step: upstream,
                        output,
                    } => {
                        let upstream_tool = match resolved.get(upstream.as_str()) {
                            Some(tool) => tool,
                            None => bail!(
                                "workflow {}: step {} consumes step {} which is not declared before it",
                                self.id,
                                step.id,
                                upstream
                            ),
                        };

                        let outputs = upstream_tool.output_parameters();
                        match outputs.iter().find(|o| o.tag == output.as_str()) {
                            Some(o) => parameter.parameter_type.receives(o.parameter_type),
                            None => bail!(
                                "workflow {}: step {} has no output {}",
                                self.id,
                                upstream,
                                output
                            ),
                        }
                    }
                    Source::Value(value) => parameter.parameter_type.accepts(value),
                };

                if !compatible {
                    bail!(
                        "workflow {}: step {} input {} ({}) cannot receive {:?}",
                        self.id,
                        step.id,
                        tag,
                        parameter.parameter_type,
                        source
                    );
                }
            }

            for parameter in parameters.iter().filter(|p| p.is_required()) {
                if !step.sources.contains_key(parameter.tag) {
                    bail!(
                        "workflow {}: required input {} of step {} is not connected",
                        self.id,
                        parameter.tag,
                        step.id
                    );
                }
            }

            let mut resolved_step = step.clone();
            resolved_step.tool_version = Some(tool.version().to_string());
            steps.push(resolved_step);
            resolved.insert(step.id.as_str(), tool);
        }

        let mut output_tags = HashSet::new();
        let mut outputs = Vec::with_capacity(self.outputs.len());
        for (tag, step, output) in &self.outputs {
            if !output_tags.insert(tag.as_str()) {
                bail!("workflow {} declares the output {} more than once", self.id, tag);
            }

            let tool = match resolved.get(step.as_str()) {
                Some(tool) => tool,
                None => bail!("workflow {}: output {} comes from unknown step {}", self.id, tag, step),
            };

            let output_type = match tool.output_parameters().iter().find(|o| o.tag == output.as_str()) {
                Some(o) => o.parameter_type.clone(),
                None => bail!("workflow {}: step {} has no output {}", self.id, step, output),
            };

            outputs.push(WorkflowOutput {
                tag: tag.clone(),
                output_type,
                step: step.clone(),
                output: output.clone(),
            });
        }

        Ok(Workflow {
            id: self.id,
            friendly_name: self.friendly_name,
            version: self.version,
            inputs: self.inputs,
            steps,
            outputs,
            metadata: self.metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{CommandToolBuilder, Selector, ToolInput, ToolOutput, VersionInfo};
    use crate::types::alignment::{Bam, BamBai, Sam};
    use crate::types::Filename;

    struct Tools(Vec<Tool>);

    impl ToolLookup for Tools {
        fn find_tool(&self, id: &str, version: Option<&str>) -> Option<&Tool> {
            self.0
                .iter()
                .rev()
                .find(|t| t.id() == id && version.map_or(true, |v| t.version() == v))
        }
    }

    fn tools() -> Tools {
        let view = CommandToolBuilder::new("View")
            .base_command(["samtools", "view"])
            .input(ToolInput::new("sam", Type::file(Sam)).position(1))
            .input(
                ToolInput::new("outputFilename", Type::Filename(Filename::with_extension(".bam")))
                    .prefix("-o"),
            )
            .output(ToolOutput::new(
                "out",
                Type::file(Bam),
                Selector::Input("outputFilename".into()),
            ))
            .version(VersionInfo::new("1.9", "samtools"))
            .build()
            .unwrap();

        let index = CommandToolBuilder::new("Index")
            .base_command(["samtools", "index"])
            .input(ToolInput::new("bam", Type::file(Bam)).position(1))
            .input(ToolInput::new("threads", Type::Int.optional()).prefix("-@"))
            .output(ToolOutput::new("out", Type::file(BamBai), Selector::Input("bam".into())))
            .version(VersionInfo::new("1.9", "samtools"))
            .build()
            .unwrap();

        Tools(vec![Tool::Command(view), Tool::Command(index)])
    }

    fn workflow() -> WorkflowBuilder {
        WorkflowBuilder::new("ViewAndIndex", "0.1.0")
            .input("sam", Type::file(Sam))
            .step(Step::new("view", "View").source("sam", Source::input("sam")))
            .step(
                Step::new("index", "Index")
                    .source("bam", Source::step("view", "out"))
                    .source("threads", Source::value(2)),
            )
            .output("out", "index", "out")
    }

    #[test]
    fn it_builds_a_connected_workflow() {
        let workflow = workflow().build(&tools()).unwrap();
        assert_eq!(workflow.steps().len(), 2);
        assert_eq!(workflow.steps()[1].tool_version.as_deref(), Some("1.9"));
        assert_eq!(workflow.outputs()[0].output_type.to_string(), "BamBai");
    }

    #[test]
    fn it_refuses_unknown_tools() {
        let err = workflow()
            .step(Step::new("other", "Missing"))
            .build(&tools())
            .unwrap_err();
        assert!(err.to_string().contains("references unknown tool Missing"));
    }

    #[test]
    fn it_refuses_forward_references() {
        let err = WorkflowBuilder::new("Backwards", "0.1.0")
            .step(Step::new("index", "Index").source("bam", Source::step("view", "out")))
            .build(&tools())
            .unwrap_err();
        assert!(err.to_string().contains("not declared before it"));
    }

    #[test]
    fn it_refuses_unconnected_required_inputs() {
        let err = WorkflowBuilder::new("Dangling", "0.1.0")
            .step(Step::new("index", "Index"))
            .build(&tools())
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("required input bam of step index is not connected"));
    }

    #[test]
    fn it_refuses_incompatible_connections() {
        let err = WorkflowBuilder::new("Mismatch", "0.1.0")
            .input("bam", Type::file(Bam))
            .step(Step::new("view", "View").source("sam", Source::input("bam")))
            .build(&tools())
            .unwrap_err();
        assert!(err.to_string().contains("cannot receive"));
    }

    #[test]
    fn it_refuses_outputs_of_unknown_steps() {
        let err = workflow()
            .output("other", "nope", "out")
            .build(&tools())
            .unwrap_err();
        assert!(err.to_string().contains("comes from unknown step nope"));
    }
}
