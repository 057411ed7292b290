//! Command-line interface for sequencing and reordering delivery routes.
//!
//! Each subcommand reads a JSON array of stops, runs one engine operation and
//! writes a JSON report to stdout or to `--output`. Arguments layer through
//! `ortho_config`: CLI flags override `STOPWISE_CMDS_<SUBCOMMAND>_*`
//! environment variables, which override configuration files.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use env_logger::{Builder, Env, Target};

mod args;
mod error;
mod report;
mod reorder;
mod sequence;

pub use error::CliError;

use reorder::ReorderArgs;
use sequence::SequenceArgs;

pub(crate) const ARG_STOPS: &str = "stops";
pub(crate) const ARG_DEPOT_LAT: &str = "depot-lat";
pub(crate) const ARG_DEPOT_LNG: &str = "depot-lng";
pub(crate) const ARG_REFERENCE_LAT: &str = "reference-lat";
pub(crate) const ARG_REFERENCE_LNG: &str = "reference-lng";
pub(crate) const ARG_CYCLE_LIMIT: &str = "cycle-limit";
pub(crate) const ARG_PROTECTED_ID: &str = "protected-id";
pub(crate) const ARG_INCLUDE_INACTIVE: &str = "include-inactive";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_STOP_ID: &str = "stop-id";
pub(crate) const ARG_DIRECTION: &str = "direction";

pub(crate) const ENV_SEQUENCE_STOPS: &str = "STOPWISE_CMDS_SEQUENCE_STOPS_PATH";
pub(crate) const ENV_SEQUENCE_DEPOT_LAT: &str = "STOPWISE_CMDS_SEQUENCE_DEPOT_LAT";
pub(crate) const ENV_SEQUENCE_DEPOT_LNG: &str = "STOPWISE_CMDS_SEQUENCE_DEPOT_LNG";
pub(crate) const ENV_SEQUENCE_REFERENCE_LAT: &str = "STOPWISE_CMDS_SEQUENCE_REFERENCE_LAT";
pub(crate) const ENV_SEQUENCE_REFERENCE_LNG: &str = "STOPWISE_CMDS_SEQUENCE_REFERENCE_LNG";
pub(crate) const ENV_REORDER_STOPS: &str = "STOPWISE_CMDS_REORDER_STOPS_PATH";
pub(crate) const ENV_REORDER_STOP_ID: &str = "STOPWISE_CMDS_REORDER_STOP_ID";
pub(crate) const ENV_REORDER_DIRECTION: &str = "STOPWISE_CMDS_REORDER_DIRECTION";

/// Run the CLI with the current process arguments and environment.
///
/// Reports are written to stdout unless `--output` names a file.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse()?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &mut stdout)
}

/// Install the stderr logger. `RUST_LOG` selects the level; the default is
/// `warn`, which still surfaces stops skipped for missing coordinates.
pub fn init_logging() -> Result<(), CliError> {
    Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Stderr)
        .format_timestamp(None)
        .try_init()
        .map_err(CliError::Logging)
}

fn dispatch(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Sequence(args) => sequence::run_sequence_with(args, writer),
        Command::Reorder(args) => reorder::run_reorder_with(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "stopwise",
    about = "Order delivery stops by nearest neighbour and adjust the result by hand",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sequence a route from a reference point.
    Sequence(SequenceArgs),
    /// Move one stop a single place up or down.
    Reorder(ReorderArgs),
}

#[cfg(test)]
mod tests;
