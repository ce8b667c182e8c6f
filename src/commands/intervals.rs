//! Functionality related to the `biowrap intervals` command.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::transforms::intervals::{write_intervals, IntervalOptions};

//========================//
// Command-line arguments //
//========================//

/// Command line arguments for `biowrap intervals`.
#[derive(Args)]
pub struct IntervalsArgs {
    /// The reference FASTA (with a .dict alongside it) or the sequence
    /// dictionary itself.
    #[arg(value_name = "REFERENCE")]
    reference: PathBuf,

    /// Prepended to the name of every BED file.
    #[arg(long, default_value = "chromosome_")]
    prefix: String,

    /// Only generate intervals for this contig. Can be repeated. All contigs
    /// when not given.
    #[arg(long = "contig", value_name = "CONTIG")]
    contigs: Vec<String>,

    /// Split contigs longer than this into chunks of at most this many bases.
    #[arg(long, value_name = "BASES")]
    max_size: Option<u64>,

    /// How many bases consecutive chunks share. Requires --max-size.
    #[arg(long, value_name = "BASES")]
    overlap: Option<u64>,

    /// Write every interval to a single {prefix}intervals.bed.
    #[arg(long)]
    single_file: bool,

    /// Where to write the BED files.
    #[arg(short = 'o', long, default_value = ".")]
    output_directory: PathBuf,
}

//==============//
// Main command //
//==============//

/// Main method for the `biowrap intervals` subcommand. Prints the path of
/// every BED file written.
pub fn intervals(args: IntervalsArgs) -> anyhow::Result<()> {
    info!("Starting intervals command...");

    let options = IntervalOptions {
        allowed_contigs: args.contigs,
        max_size: args.max_size,
        overlap: args.overlap.unwrap_or(0),
    };

    let written = write_intervals(
        &args.reference,
        &args.output_directory,
        &args.prefix,
        &options,
        args.single_file,
    )?;

    for path in written {
        println!("{}", path.display());
    }

    Ok(())
}
