//! Focused unit tests covering `reorder` configuration and execution.

use super::helpers::{SEQUENCED_ROUTE, StopsWorkspace};
use super::*;
use crate::reorder::{ReorderConfig, config_from_layers_for_test, execute_reorder};
use rstest::rstest;
use stopwise_core::{Direction, ExclusionRules};

fn config_for(workspace: &StopsWorkspace, stop_id: u64, direction: Direction) -> ReorderConfig {
    ReorderConfig {
        stops_path: workspace.stops_path.clone(),
        stop_id,
        direction,
        rules: ExclusionRules::default(),
        output: None,
    }
}

#[rstest]
#[case::stop_id(ARG_STOP_ID, ENV_REORDER_STOP_ID)]
#[case::direction(ARG_DIRECTION, ENV_REORDER_DIRECTION)]
fn converting_without_required_fields_errors(
    #[case] missing: &'static str,
    #[case] env_var: &'static str,
) {
    let args = ReorderArgs {
        stops_path: Some("stops.json".into()),
        stop_id: (missing != ARG_STOP_ID).then_some(20),
        direction: (missing != ARG_DIRECTION).then_some(Direction::Up),
        ..ReorderArgs::default()
    };
    let err = ReorderConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, missing);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case(20, Direction::Up, "moved", vec![20, 10, 30])]
#[case(20, Direction::Down, "moved", vec![10, 30, 20])]
#[case(10, Direction::Up, "at_boundary", vec![10, 20, 30])]
#[case(30, Direction::Down, "at_boundary", vec![10, 20, 30])]
#[case(99, Direction::Down, "not_found", vec![10, 20, 30])]
fn execute_reorder_reports_outcome(
    #[case] stop_id: u64,
    #[case] direction: Direction,
    #[case] outcome: &str,
    #[case] expected: Vec<u64>,
) {
    let workspace = StopsWorkspace::with_stops(SEQUENCED_ROUTE);
    let report =
        execute_reorder(&config_for(&workspace, stop_id, direction)).expect("reorder succeeds");
    assert_eq!(report.outcome, outcome);
    let ids: Vec<u64> = report.stops.iter().map(|s| s.id).collect();
    assert_eq!(ids, expected);
}

#[rstest]
fn protected_stop_cannot_be_moved() {
    let workspace = StopsWorkspace::with_stops(SEQUENCED_ROUTE);
    let config = ReorderConfig {
        rules: ExclusionRules::default().with_protected(20),
        ..config_for(&workspace, 20, Direction::Up)
    };
    let report = execute_reorder(&config).expect("reorder succeeds");
    assert_eq!(report.outcome, "not_found");
}

#[rstest]
fn direction_layers_from_environment() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_environment(json!({
        "stops_path": "stops.json",
        "stop_id": 20,
        "direction": "down",
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.direction, Direction::Down);
    assert_eq!(config.stop_id, 20);
}
