//! Functionality related to the `biowrap describe` command.

use clap::Args;
use tracing::debug;

use crate::registry::Registry;

//========================//
// Command-line arguments //
//========================//

/// Command line arguments for `biowrap describe`.
#[derive(Args)]
pub struct DescribeArgs {
    /// Identifier of the tool or workflow to describe.
    #[arg(value_name = "TOOL")]
    tool: String,

    /// Version to describe. Defaults to the latest registered version.
    #[arg(long)]
    tool_version: Option<String>,
}

//==============//
// Main command //
//==============//

/// Main method for the `biowrap describe` subcommand.
pub fn describe(args: DescribeArgs, registry: &Registry) -> anyhow::Result<()> {
    let tool = super::find_tool(registry, &args.tool, args.tool_version.as_deref())?;
    debug!("Describing {} {} (version {}).", tool.kind(), tool.id(), tool.version());

    println!("{}", serde_json::to_string_pretty(&tool.schema())?);
    Ok(())
}
