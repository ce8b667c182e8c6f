//! Functionality related to the `biowrap command` command.

use clap::Args;

use crate::registry::Registry;
use crate::utils::args::{input_values, parse_input_pair};

//========================//
// Command-line arguments //
//========================//

/// Command line arguments for `biowrap command`.
#[derive(Args)]
pub struct CommandArgs {
    /// Identifier of the tool to preview.
    #[arg(value_name = "TOOL")]
    tool: String,

    /// Version to preview. Defaults to the latest registered version.
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

/// Main method for the `biowrap command` subcommand. Prints the command line
/// the tool describes for the given inputs; nothing is executed.
pub fn command(args: CommandArgs, registry: &Registry) -> anyhow::Result<()> {
    let tool = super::find_tool(registry, &args.tool, args.tool_version.as_deref())?;
    let values = input_values(tool, args.inputs)?;

    println!("{}", tool.command_line(&values)?);
    Ok(())
}
