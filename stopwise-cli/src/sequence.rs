//! `sequence` command implementation.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stopwise_core::{
    DEFAULT_CYCLE_LIMIT, ExclusionRules, Stop, Waypoint, plan_waypoints, route_distance_km,
    sequence,
};

use crate::args::{exclusion_rules, required};
use crate::report::{load_stops, require_existing, write_report};
use crate::{
    ARG_CYCLE_LIMIT, ARG_DEPOT_LAT, ARG_DEPOT_LNG, ARG_INCLUDE_INACTIVE, ARG_OUTPUT,
    ARG_PROTECTED_ID, ARG_REFERENCE_LAT, ARG_REFERENCE_LNG, ARG_STOPS, CliError,
    ENV_SEQUENCE_DEPOT_LAT, ENV_SEQUENCE_DEPOT_LNG, ENV_SEQUENCE_REFERENCE_LAT,
    ENV_SEQUENCE_REFERENCE_LNG, ENV_SEQUENCE_STOPS,
};

/// CLI arguments for the `sequence` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "sequence",
    long_about = "Order the active stops of a route by repeatedly visiting the \
                 nearest remaining stop, starting from the reference point. \
                 The reference defaults to the depot. Stops without \
                 coordinates are reported as skipped.",
    about = "Sequence a route by nearest neighbour"
)]
#[ortho_config(prefix = "STOPWISE")]
pub(crate) struct SequenceArgs {
    /// Path to a JSON array of stops.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) stops_path: Option<Utf8PathBuf>,
    /// Depot latitude; the map route returns here.
    #[arg(long = ARG_DEPOT_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) depot_lat: Option<f64>,
    /// Depot longitude.
    #[arg(long = ARG_DEPOT_LNG, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) depot_lng: Option<f64>,
    /// Latitude to start sequencing from (defaults to the depot).
    #[arg(long = ARG_REFERENCE_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) reference_lat: Option<f64>,
    /// Longitude to start sequencing from (defaults to the depot).
    #[arg(long = ARG_REFERENCE_LNG, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) reference_lng: Option<f64>,
    /// Stops served before the map route returns to the depot; 0 disables.
    #[arg(long = ARG_CYCLE_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) cycle_limit: Option<usize>,
    /// Stop id that must never be sequenced.
    #[arg(long = ARG_PROTECTED_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) protected_id: Option<u64>,
    /// Sequence delivered and failed stops as well.
    #[arg(long = ARG_INCLUDE_INACTIVE)]
    #[serde(default)]
    pub(crate) include_inactive: bool,
    /// Write the report here instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl SequenceArgs {
    pub(crate) fn into_config(self) -> Result<SequenceConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SequenceConfig::try_from(merged)
    }
}

/// Resolved `sequence` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SequenceConfig {
    pub(crate) stops_path: Utf8PathBuf,
    pub(crate) depot: Coord<f64>,
    pub(crate) reference: Coord<f64>,
    pub(crate) cycle_limit: usize,
    pub(crate) rules: ExclusionRules,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<SequenceArgs> for SequenceConfig {
    type Error = CliError;

    fn try_from(args: SequenceArgs) -> Result<Self, Self::Error> {
        let stops_path = required(args.stops_path, ARG_STOPS, ENV_SEQUENCE_STOPS)?;
        let depot = Coord {
            x: required(args.depot_lng, ARG_DEPOT_LNG, ENV_SEQUENCE_DEPOT_LNG)?,
            y: required(args.depot_lat, ARG_DEPOT_LAT, ENV_SEQUENCE_DEPOT_LAT)?,
        };
        let reference = match (args.reference_lat, args.reference_lng) {
            (None, None) => depot,
            (lat, lng) => Coord {
                x: required(lng, ARG_REFERENCE_LNG, ENV_SEQUENCE_REFERENCE_LNG)?,
                y: required(lat, ARG_REFERENCE_LAT, ENV_SEQUENCE_REFERENCE_LAT)?,
            },
        };
        Ok(Self {
            stops_path,
            depot,
            reference,
            cycle_limit: args.cycle_limit.unwrap_or(DEFAULT_CYCLE_LIMIT),
            rules: exclusion_rules(args.protected_id, args.include_inactive),
            output: args.output,
        })
    }
}

/// JSON report written by `sequence`.
#[derive(Debug, Serialize)]
pub(crate) struct SequenceReport {
    /// Stops in visiting order with their new indices.
    pub(crate) order: Vec<Stop>,
    /// Ids of stops left out for lacking coordinates.
    pub(crate) skipped: Vec<u64>,
    /// Great-circle length from the reference, through every stop, back to
    /// the depot.
    pub(crate) distance_km: f64,
    /// Points to draw on a map, including any depot return.
    pub(crate) waypoints: Vec<Waypoint>,
}

pub(crate) fn run_sequence_with(args: SequenceArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.stops_path, ARG_STOPS)?;
    let report = execute_sequence(&config)?;
    write_report(&report, config.output.as_deref(), writer)
}

pub(crate) fn execute_sequence(config: &SequenceConfig) -> Result<SequenceReport, CliError> {
    let stops = load_stops(&config.stops_path)?;
    let sequencing = sequence(config.reference, stops, |stop| config.rules.excludes(stop))?;
    let skipped = sequencing.skipped.clone();
    let order = sequencing.into_indexed()?;
    let distance_km = route_distance_km(config.reference, &order, Some(config.depot));
    let waypoints = plan_waypoints(&order, config.depot, config.cycle_limit);
    log::info!(
        "sequenced {} stop(s) covering {distance_km:.1} km; skipped {}",
        order.len(),
        skipped.len()
    );
    Ok(SequenceReport {
        order,
        skipped,
        distance_km,
        waypoints,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SequenceConfig, CliError> {
    let merged = SequenceArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SequenceConfig::try_from(merged)
}
