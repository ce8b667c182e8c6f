//! The registry of every data type, tool and workflow in the catalog.
//!
//! # Overview
//!
//! [`Registry::discover`] walks the catalog once at startup:
//!
//! 1. every data type from [`crate::types::get_all_data_types`],
//! 2. every tool of every provider from [`crate::tools::get_all_providers`],
//! 3. every workflow from [`crate::workflows::get_all_workflows`], each built
//!    against the tools registered so far.
//!
//! What happens when a definition fails to build, or clashes with one that
//! is already registered, is decided by the [`RegistryConfig`]. The process
//! wide registry is set up once with [`init`] and read with [`global`].

use std::fmt::Display;
use std::sync::Arc;
use std::sync::OnceLock;

use anyhow::bail;
use indexmap::IndexMap;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::tool::Tool;
use crate::tool::ToolKind;
use crate::tools::get_all_providers;
use crate::tools::Provider;
use crate::types::get_all_data_types;
use crate::types::DataType;
use crate::workflow::ToolLookup;
use crate::workflows::get_all_workflows;

/// The name the workflows are ignored by in [`RegistryConfig::ignore`].
pub const WORKFLOWS_PROVIDER: &str = "workflows";

static REGISTRY: OnceLock<Registry> = OnceLock::new();

//==========//
// Policies //
//==========//

/// What to do when a definition cannot be built or registered.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log the error at the `warn` level and carry on with the next
    /// definition.
    #[default]
    Skip,

    /// Abort discovery with the error.
    Fail,
}

impl Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// What to do when a definition is registered under a name (tool identifier
/// and version, or data type name) that is already taken.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Refuse the later definition with an error.
    #[default]
    Reject,

    /// Keep the definition registered first and ignore the later one.
    KeepFirst,

    /// Replace the registered definition with the later one.
    Replace,
}

impl Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::KeepFirst => write!(f, "keep-first"),
            Self::Replace => write!(f, "replace"),
        }
    }
}

/// How the registry handles failing and clashing definitions.
#[derive(Clone, Debug, Default)]
pub struct RegistryConfig {
    /// What to do with a definition that fails.
    pub errors: ErrorPolicy,

    /// What to do with a definition whose name is taken.
    pub duplicates: DuplicatePolicy,

    /// Providers to leave out of discovery (matched case-insensitively).
    /// [`WORKFLOWS_PROVIDER`] leaves out the workflows.
    pub ignore: Vec<String>,
}

impl RegistryConfig {
    fn ignores(&self, provider: &str) -> bool {
        self.ignore.iter().any(|i| i.eq_ignore_ascii_case(provider))
    }

    /// The names in the ignore list that match no provider (most likely
    /// typos).
    fn unknown_ignores<'a>(&'a self, providers: &[Provider]) -> Vec<&'a str> {
        self.ignore
            .iter()
            .filter(|i| {
                !i.eq_ignore_ascii_case(WORKFLOWS_PROVIDER)
                    && !providers.iter().any(|p| i.eq_ignore_ascii_case(p.name))
            })
            .map(String::as_str)
            .collect()
    }
}

//==========//
// Registry //
//==========//

/// Every registered data type and tool. Tools are keyed by identifier, then
/// by version, in registration order.
#[derive(Debug, Default)]
pub struct Registry {
    config: RegistryConfig,
    tools: IndexMap<String, IndexMap<String, Tool>>,
    types: IndexMap<String, Arc<dyn DataType>>,
    skipped: Vec<String>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Creates a registry and registers everything in the catalog.
    pub fn discover(config: &RegistryConfig) -> anyhow::Result<Self> {
        let mut registry = Self::new(config.clone());

        for data_type in get_all_data_types() {
            let source = format!("data type {}", data_type.name());
            let result = registry.register_type(data_type);
            registry.handle(&source, result)?;
        }

        let providers = get_all_providers();
        for ignored in registry.config.unknown_ignores(&providers) {
            warn!("Ignored provider {} does not match any provider.", ignored);
        }

        for provider in providers {
            if registry.config.ignores(provider.name) {
                info!("Ignoring provider {}.", provider.name);
                continue;
            }

            debug!("Registering the tools of provider {}.", provider.name);
            for definition in (provider.definitions)() {
                let result = definition.and_then(|tool| registry.register_tool(tool));
                registry.handle(provider.name, result)?;
            }
        }

        if registry.config.ignores(WORKFLOWS_PROVIDER) {
            info!("Ignoring the workflows.");
        } else {
            for builder in get_all_workflows() {
                let result = builder
                    .build(&registry)
                    .and_then(|workflow| registry.register_tool(Tool::Workflow(workflow)));
                registry.handle(WORKFLOWS_PROVIDER, result)?;
            }
        }

        registry.log_summary();
        Ok(registry)
    }

    /// Applies the error policy to the result of registering a definition
    /// from `source`.
    fn handle(&mut self, source: &str, result: anyhow::Result<()>) -> anyhow::Result<()> {
        let err = match result {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };

        match self.config.errors {
            ErrorPolicy::Skip => {
                warn!("Skipping a definition from {}: {:#}", source, err);
                self.skipped.push(format!("{}: {:#}", source, err));
                Ok(())
            }
            ErrorPolicy::Fail => Err(err.context(format!("registering a definition from {}", source))),
        }
    }

    /// Registers a tool under its identifier and version.
    pub fn register_tool(&mut self, tool: Tool) -> anyhow::Result<()> {
        let id = tool.id().to_string();
        let version = tool.version().to_string();

        // Identifiers are looked up case-insensitively, so they must also be
        // unique case-insensitively.
        let key = self
            .tools
            .keys()
            .find(|key| key.eq_ignore_ascii_case(&id))
            .cloned()
            .unwrap_or_else(|| id.clone());
        let versions = self.tools.entry(key).or_default();

        if versions.contains_key(&version) {
            match self.config.duplicates {
                DuplicatePolicy::Reject => bail!(
                    "{} {} (version {}) is already registered",
                    tool.kind(),
                    id,
                    version
                ),
                DuplicatePolicy::KeepFirst => {
                    warn!(
                        "{} {} (version {}) is already registered; keeping the first definition.",
                        tool.kind(),
                        id,
                        version
                    );
                    return Ok(());
                }
                DuplicatePolicy::Replace => warn!(
                    "{} {} (version {}) is already registered; replacing it.",
                    tool.kind(),
                    id,
                    version
                ),
            }
        }

        debug!("Registered {} {} (version {}).", tool.kind(), id, version);
        versions.insert(version, tool);
        Ok(())
    }

    /// Registers a data type under its name.
    pub fn register_type(&mut self, data_type: Arc<dyn DataType>) -> anyhow::Result<()> {
        let name = data_type.name();
        let existing = self
            .types
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .cloned();

        let key = match existing {
            None => name.to_string(),
            Some(key) => match self.config.duplicates {
                DuplicatePolicy::Reject => bail!("data type {} is already registered", name),
                DuplicatePolicy::KeepFirst => {
                    warn!("Data type {} is already registered; keeping the first definition.", name);
                    return Ok(());
                }
                DuplicatePolicy::Replace => {
                    warn!("Data type {} is already registered; replacing it.", name);
                    key
                }
            },
        };

        self.types.insert(key, data_type);
        Ok(())
    }

    fn versions_of(&self, id: &str) -> Option<&IndexMap<String, Tool>> {
        self.tools.get(id).or_else(|| {
            self.tools
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(id))
                .map(|(_, versions)| versions)
        })
    }

    /// Gets a tool or workflow by identifier (matched case-insensitively) and
    /// version. Without a version, the version registered last is returned.
    pub fn tool(&self, id: &str, version: Option<&str>) -> Option<&Tool> {
        let versions = self.versions_of(id)?;
        match version {
            Some(version) => versions.get(version),
            None => versions.last().map(|(_, tool)| tool),
        }
    }

    /// The registered versions of a tool, in registration order.
    pub fn versions(&self, id: &str) -> Vec<&str> {
        self.versions_of(id)
            .map(|versions| versions.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every registered tool identifier, in registration order.
    pub fn tool_ids(&self) -> impl Iterator<Item = &str> {
        self.tools
            .iter()
            .filter(|(_, versions)| !versions.is_empty())
            .map(|(id, _)| id.as_str())
    }

    /// The default (last registered) version of every tool and workflow.
    pub fn default_tools(&self) -> impl Iterator<Item = &Tool> {
        self.tools
            .values()
            .filter_map(|versions| versions.last().map(|(_, tool)| tool))
    }

    /// Every version of every tool and workflow.
    pub fn tools(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values().flat_map(|versions| versions.values())
    }

    /// Gets a data type by name (matched case-insensitively).
    pub fn data_type(&self, name: &str) -> Option<&Arc<dyn DataType>> {
        self.types.get(name).or_else(|| {
            self.types
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, data_type)| data_type)
        })
    }

    /// Every registered data type, in registration order.
    pub fn data_types(&self) -> impl Iterator<Item = &Arc<dyn DataType>> {
        self.types.values()
    }

    /// The errors skipped during discovery.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    fn log_summary(&self) {
        let count = |kind: ToolKind| self.default_tools().filter(|t| t.kind() == kind).count();

        info!(
            "Registered {} data types, {} command tools, {} code tools and {} workflows \
            ({} tool versions in total).",
            self.types.len(),
            count(ToolKind::CommandTool),
            count(ToolKind::CodeTool),
            count(ToolKind::Workflow),
            self.tools().count()
        );

        if !self.skipped.is_empty() {
            warn!(
                "Skipped {} definition(s) that could not be registered.",
                self.skipped.len()
            );
        }
    }
}

impl ToolLookup for Registry {
    fn find_tool(&self, id: &str, version: Option<&str>) -> Option<&Tool> {
        self.tool(id, version)
    }
}

//=================//
// Global registry //
//=================//

/// Discovers the catalog into the process-wide registry. The registry can
/// only be set up once: later calls return the existing registry and ignore
/// `config`.
pub fn init(config: &RegistryConfig) -> anyhow::Result<&'static Registry> {
    if let Some(registry) = REGISTRY.get() {
        warn!("The registry is already initialized; ignoring the new configuration.");
        return Ok(registry);
    }

    let registry = Registry::discover(config)?;
    Ok(REGISTRY.get_or_init(|| registry))
}

/// The process-wide registry, discovered with the default configuration if
/// [`init`] was never called.
pub fn global() -> anyhow::Result<&'static Registry> {
    match REGISTRY.get() {
        Some(registry) => Ok(registry),
        None => init(&RegistryConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{CommandToolBuilder, VersionInfo};
    use crate::types::alignment::Bam;

    fn named(id: &str, version: &str, container: &str) -> Tool {
        Tool::Command(
            CommandToolBuilder::new(id)
                .base_command(["echo"])
                .version(VersionInfo::new(version, container))
                .build()
                .unwrap(),
        )
    }

    fn echo(version: &str, container: &str) -> Tool {
        named("Echo", version, container)
    }

    #[derive(Debug)]
    struct FirstBam;

    impl DataType for FirstBam {
        fn name(&self) -> &'static str {
            "BAM"
        }

        fn doc(&self) -> &'static str {
            "first"
        }
    }

    #[derive(Debug)]
    struct SecondBam;

    impl DataType for SecondBam {
        fn name(&self) -> &'static str {
            "bam"
        }

        fn doc(&self) -> &'static str {
            "second"
        }
    }

    fn registry(duplicates: DuplicatePolicy) -> Registry {
        Registry::new(RegistryConfig {
            duplicates,
            ..Default::default()
        })
    }

    #[test]
    fn it_registers_the_whole_catalog_without_errors() {
        let registry = Registry::discover(&RegistryConfig {
            errors: ErrorPolicy::Fail,
            ..Default::default()
        })
        .unwrap();

        assert!(registry.skipped().is_empty());
        assert_eq!(registry.data_types().count(), get_all_data_types().len());
        assert!(registry.tool("BwaAligner", None).is_some());
        assert!(registry.tool("GenerateIntervalsByChromosome", None).is_some());
    }

    #[test]
    fn it_looks_tools_up_case_insensitively_with_the_last_version_as_default() {
        let registry = Registry::discover(&RegistryConfig::default()).unwrap();

        let tool = registry.tool("samtoolsview", None).unwrap();
        assert_eq!(tool.id(), "SamToolsView");
        assert_eq!(tool.version(), "1.9.0");
        assert_eq!(
            registry.tool("SamToolsView", Some("1.7.0")).unwrap().version(),
            "1.7.0"
        );
        assert!(registry.tool("SamToolsView", Some("0.1")).is_none());
        assert_eq!(registry.versions("SamToolsView"), vec!["1.7.0", "1.9.0"]);
        assert!(registry.data_type("bam").is_some());
    }

    #[test]
    fn it_rejects_duplicates_by_default() {
        let mut registry = registry(DuplicatePolicy::Reject);
        registry.register_tool(echo("1", "echo:first")).unwrap();
        registry.register_tool(echo("2", "echo:other")).unwrap();

        let err = registry.register_tool(echo("1", "echo:second")).unwrap_err();
        assert!(err.to_string().contains("already registered"));
        assert_eq!(registry.tool("Echo", Some("1")).unwrap().container(), Some("echo:first"));

        registry.register_type(Arc::new(Bam)).unwrap();
        assert!(registry.register_type(Arc::new(Bam)).is_err());
    }

    #[test]
    fn it_keeps_the_first_duplicate() {
        let mut registry = registry(DuplicatePolicy::KeepFirst);
        registry.register_tool(echo("1", "echo:first")).unwrap();
        registry.register_tool(echo("1", "echo:second")).unwrap();

        assert_eq!(registry.tool("Echo", None).unwrap().container(), Some("echo:first"));
        assert_eq!(registry.tools().count(), 1);
    }

    #[test]
    fn it_replaces_with_the_last_duplicate() {
        let mut registry = registry(DuplicatePolicy::Replace);
        registry.register_tool(echo("1", "echo:first")).unwrap();
        registry.register_tool(echo("1", "echo:second")).unwrap();

        assert_eq!(registry.tool("Echo", None).unwrap().container(), Some("echo:second"));
        assert_eq!(registry.tools().count(), 1);
    }

    #[test]
    fn it_treats_identifiers_differing_in_case_as_duplicates() {
        let mut registry = registry(DuplicatePolicy::Reject);
        registry.register_tool(named("Echo", "1", "echo:first")).unwrap();
        assert!(registry.register_tool(named("ECHO", "1", "echo:second")).is_err());
        assert_eq!(registry.tool_ids().collect::<Vec<_>>(), vec!["Echo"]);

        registry.register_tool(named("ECHO", "2", "echo:second")).unwrap();
        assert_eq!(registry.versions("echo"), vec!["1", "2"]);
        assert_eq!(registry.tool("echo", None).unwrap().container(), Some("echo:second"));

        registry.register_type(Arc::new(FirstBam)).unwrap();
        assert!(registry.register_type(Arc::new(SecondBam)).is_err());
        assert_eq!(registry.data_types().count(), 1);
    }

    #[test]
    fn it_keeps_the_first_duplicate_type() {
        let mut registry = registry(DuplicatePolicy::KeepFirst);
        registry.register_type(Arc::new(FirstBam)).unwrap();
        registry.register_type(Arc::new(SecondBam)).unwrap();

        assert_eq!(registry.data_types().count(), 1);
        assert_eq!(registry.data_type("bam").unwrap().doc(), "first");
    }

    #[test]
    fn it_replaces_with_the_last_duplicate_type() {
        let mut registry = registry(DuplicatePolicy::Replace);
        registry.register_type(Arc::new(FirstBam)).unwrap();
        registry.register_type(Arc::new(SecondBam)).unwrap();

        assert_eq!(registry.data_types().count(), 1);
        assert_eq!(registry.data_type("BAM").unwrap().doc(), "second");
    }

    #[test]
    fn it_reports_ignored_names_that_match_no_provider() {
        let config = RegistryConfig {
            ignore: vec![
                String::from("GATK4"),
                String::from("workflows"),
                String::from("samtool"),
            ],
            ..Default::default()
        };

        assert_eq!(config.unknown_ignores(&get_all_providers()), vec!["samtool"]);
    }

    #[test]
    fn it_skips_or_fails_on_errors() {
        let mut skipping = Registry::new(RegistryConfig::default());
        skipping
            .handle("test", Err(anyhow::anyhow!("broken definition")))
            .unwrap();
        assert_eq!(skipping.skipped(), &["test: broken definition".to_string()]);

        let mut failing = Registry::new(RegistryConfig {
            errors: ErrorPolicy::Fail,
            ..Default::default()
        });
        assert!(failing
            .handle("test", Err(anyhow::anyhow!("broken definition")))
            .is_err());
    }

    #[test]
    fn it_leaves_out_ignored_providers() {
        let registry = Registry::discover(&RegistryConfig {
            ignore: vec![String::from("SAMTOOLS"), String::from(WORKFLOWS_PROVIDER)],
            ..Default::default()
        })
        .unwrap();

        assert!(registry.tool("SamToolsView", None).is_none());
        assert!(registry.tool("BcfToolsView", None).is_some());
        assert!(registry.tool("BwaAligner", None).is_none());
        assert!(registry.skipped().is_empty());
    }

    #[test]
    fn it_skips_workflows_whose_tools_are_missing() {
        let registry = Registry::discover(&RegistryConfig {
            ignore: vec![String::from("samtools")],
            ..Default::default()
        })
        .unwrap();

        assert!(registry.tool("BwaAligner", None).is_none());
        assert!(registry
            .skipped()
            .iter()
            .any(|s| s.contains("BwaAligner")));
    }
}
