use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use git_testament::{git_testament, render_testament};

use biowrap::commands::adapters::{self, AdaptersArgs};
use biowrap::commands::command::{self, CommandArgs};
use biowrap::commands::describe::{self, DescribeArgs};
use biowrap::commands::intervals::{self, IntervalsArgs};
use biowrap::commands::list::{self, ListArgs};
use biowrap::commands::run::{self, RunArgs};
use biowrap::registry::{self, RegistryConfig};
use biowrap::utils::args::RegistryArgs;

git_testament!(TESTAMENT);

/// Declarative wrappers for bioinformatics command line tools.
#[derive(Parser)]
#[command(name = "biowrap", propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    subcommand: Subcommands,

    /// Only errors are printed to the stderr stream.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// All available information, including debug information, is printed
    /// to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    registry: RegistryArgs,
}

#[derive(Subcommand)]
enum Subcommands {
    /// Lists the registered tools, data types or workflows.
    List(ListArgs),

    /// Prints the schema of a tool or workflow as JSON.
    Describe(DescribeArgs),

    /// Previews the command line a tool describes for a set of inputs.
    Command(CommandArgs),

    /// Runs a code tool in-process.
    Run(RunArgs),

    /// Generates BED intervals from a reference's sequence dictionary.
    Intervals(IntervalsArgs),

    /// Finds the adapters reported by FastQC in an adapter lookup.
    Adapters(AdaptersArgs),
}

fn main() -> anyhow::Result<()> {
    let version = render_testament!(TESTAMENT);
    let matches = Cli::command().version(version).get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let mut level = tracing::Level::INFO;
    if cli.quiet {
        level = tracing::Level::ERROR;
    } else if cli.verbose {
        level = tracing::Level::DEBUG;
    }

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let config = RegistryConfig::from(cli.registry);

    match cli.subcommand {
        Subcommands::List(args) => list::list(args, registry::init(&config)?),
        Subcommands::Describe(args) => describe::describe(args, registry::init(&config)?),
        Subcommands::Command(args) => command::command(args, registry::init(&config)?),
        Subcommands::Run(args) => run::run(args, registry::init(&config)?),
        Subcommands::Intervals(args) => intervals::intervals(args),
        Subcommands::Adapters(args) => adapters::adapters(args),
    }
}
