//! Functionality related to the `biowrap adapters` command.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::transforms::fastqc::parse_fastqc_adapters;

//========================//
// Command-line arguments //
//========================//

/// Command line arguments for `biowrap adapters`.
#[derive(Args)]
pub struct AdaptersArgs {
    /// The fastqc_data.txt of a FastQC report.
    #[arg(value_name = "FASTQC_DATA")]
    fastqc_data: PathBuf,

    /// Named adapters to look the reported sources up in, as name[tab]sequence
    /// lines. Lines starting with a hash are ignored.
    #[arg(long, value_name = "FILE")]
    lookup: Option<PathBuf>,
}

//==============//
// Main command //
//==============//

/// Main method for the `biowrap adapters` subcommand. Prints the adapter
/// sequences as a JSON array.
pub fn adapters(args: AdaptersArgs) -> anyhow::Result<()> {
    info!("Starting adapters command...");

    let adapters = parse_fastqc_adapters(&args.fastqc_data, args.lookup.as_deref())?;
    println!("{}", serde_json::to_string(&adapters)?);

    Ok(())
}
