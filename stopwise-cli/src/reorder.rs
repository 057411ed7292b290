//! `reorder` command implementation.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stopwise_core::{Direction, ExclusionRules, Stop, reorder_adjacent};

use crate::args::{exclusion_rules, required};
use crate::report::{load_stops, require_existing, write_report};
use crate::{
    ARG_DIRECTION, ARG_INCLUDE_INACTIVE, ARG_OUTPUT, ARG_PROTECTED_ID, ARG_STOP_ID, ARG_STOPS,
    CliError, ENV_REORDER_DIRECTION, ENV_REORDER_STOP_ID, ENV_REORDER_STOPS,
};

/// CLI arguments for the `reorder` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "reorder",
    long_about = "Swap one stop with its neighbour in sequence order and \
                 renumber the route. Moving the first stop up or the last \
                 stop down leaves the route unchanged.",
    about = "Move a stop one place up or down"
)]
#[ortho_config(prefix = "STOPWISE")]
pub(crate) struct ReorderArgs {
    /// Path to a JSON array of stops.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) stops_path: Option<Utf8PathBuf>,
    /// Id of the stop to move.
    #[arg(long = ARG_STOP_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) stop_id: Option<u64>,
    /// `up` or `down`.
    #[arg(long = ARG_DIRECTION, value_name = "direction")]
    #[serde(default)]
    pub(crate) direction: Option<Direction>,
    /// Stop id left out of the route.
    #[arg(long = ARG_PROTECTED_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) protected_id: Option<u64>,
    /// Keep delivered and failed stops in the route.
    #[arg(long = ARG_INCLUDE_INACTIVE)]
    #[serde(default)]
    pub(crate) include_inactive: bool,
    /// Write the report here instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl ReorderArgs {
    pub(crate) fn into_config(self) -> Result<ReorderConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ReorderConfig::try_from(merged)
    }
}

/// Resolved `reorder` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReorderConfig {
    pub(crate) stops_path: Utf8PathBuf,
    pub(crate) stop_id: u64,
    pub(crate) direction: Direction,
    pub(crate) rules: ExclusionRules,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<ReorderArgs> for ReorderConfig {
    type Error = CliError;

    fn try_from(args: ReorderArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            stops_path: required(args.stops_path, ARG_STOPS, ENV_REORDER_STOPS)?,
            stop_id: required(args.stop_id, ARG_STOP_ID, ENV_REORDER_STOP_ID)?,
            direction: required(args.direction, ARG_DIRECTION, ENV_REORDER_DIRECTION)?,
            rules: exclusion_rules(args.protected_id, args.include_inactive),
            output: args.output,
        })
    }
}

/// JSON report written by `reorder`.
#[derive(Debug, Serialize)]
pub(crate) struct ReorderReport {
    /// `moved`, `at_boundary` or `not_found`.
    pub(crate) outcome: &'static str,
    /// The route after the request, in sequence order when moved.
    pub(crate) stops: Vec<Stop>,
}

pub(crate) fn run_reorder_with(args: ReorderArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.stops_path, ARG_STOPS)?;
    let report = execute_reorder(&config)?;
    write_report(&report, config.output.as_deref(), writer)
}

pub(crate) fn execute_reorder(config: &ReorderConfig) -> Result<ReorderReport, CliError> {
    let route: Vec<Stop> = load_stops(&config.stops_path)?
        .into_iter()
        .filter(|stop| !config.rules.excludes(stop))
        .collect();
    let outcome = reorder_adjacent(route, config.stop_id, config.direction)?;
    if !outcome.is_moved() {
        log::warn!(
            "stop {} was not moved {}: {}",
            config.stop_id,
            config.direction,
            outcome.label()
        );
    }
    Ok(ReorderReport {
        outcome: outcome.label(),
        stops: outcome.into_stops(),
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ReorderConfig, CliError> {
    let merged = ReorderArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ReorderConfig::try_from(merged)
}
