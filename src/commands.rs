//! The `biowrap` subcommands.

pub mod adapters;
pub mod command;
pub mod describe;
pub mod intervals;
pub mod list;
pub mod run;

use anyhow::bail;

use crate::registry::Registry;
use crate::tool::Tool;

/// Looks a tool or workflow up in the registry, failing with the versions
/// that are registered when the requested one is not.
pub fn find_tool<'a>(
    registry: &'a Registry,
    id: &str,
    version: Option<&str>,
) -> anyhow::Result<&'a Tool> {
    if let Some(tool) = registry.tool(id, version) {
        return Ok(tool);
    }

    let versions = registry.versions(id);
    match (version, versions.is_empty()) {
        (_, true) => bail!("unknown tool: {}", id),
        (Some(version), false) => bail!(
            "{} has no version {}. Registered versions: {}",
            id,
            version,
            versions.join(", ")
        ),
        (None, false) => bail!("unknown tool: {}", id),
    }
}
