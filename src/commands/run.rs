//! Functionality related to the `biowrap run` command.

use anyhow::bail;
use clap::Args;
use tracing::info;

use crate::registry::Registry;
use crate::tool::Tool;
use crate::utils::args::{input_values, parse_input_pair};

//========================//
// Command-line arguments //
//========================//

/// Command line arguments for `biowrap run`.
#[derive(Args)]
pub struct RunArgs {
    /// Identifier of the code tool to run.
    #[arg(value_name = "TOOL")]
    tool: String,

    /// Version to run. Defaults to the latest registered version.
    #[arg(long)]
    tool_version: Option<String>,

    /// An input value, given as tag=value. Array values are comma-separated
    /// or given by repeating the input.
    #[arg(short = 'i', long = "input", value_name = "TAG=VALUE", value_parser = parse_input_pair)]
    inputs: Vec<(String, String)>,
}

//==============//
// Main command //
//==============//

/// Main method for the `biowrap run` subcommand. Only code tools run
/// in-process; their outputs are printed as JSON.
pub fn run(args: RunArgs, registry: &Registry) -> anyhow::Result<()> {
    let tool = super::find_tool(registry, &args.tool, args.tool_version.as_deref())?;
    let code = match tool {
        Tool::Code(code) => code,
        other => bail!(
            "{} is a {}: only code tools can be run by biowrap",
            other.id(),
            other.kind()
        ),
    };

    info!("Starting run command for {} (version {})...", tool.id(), tool.version());
    let values = input_values(tool, args.inputs)?;
    let outputs = code.run(&values)?;

    println!("{}", serde_json::to_string_pretty(&outputs)?);
    Ok(())
}
