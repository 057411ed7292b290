//! Behavioural tests for the nearest-neighbour sequencer using rstest-bdd.

use std::cell::RefCell;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use stopwise_core::test_support::{ids, indices, stop};
use stopwise_core::{ExclusionRules, SequenceError, Sequencing, Stop, sequence};

const DEPOT: Coord<f64> = Coord { x: 0.0, y: 0.0 };
const PROTECTED: u64 = 349;

#[derive(Debug, Default)]
struct SequencerWorld {
    stops: RefCell<Vec<Stop>>,
    result: RefCell<Option<Result<Sequencing, SequenceError>>>,
}

impl SequencerWorld {
    fn run(&self, reference: Coord<f64>, rules: &ExclusionRules) {
        let stops = self.stops.borrow().clone();
        let result = sequence(reference, stops, |s| rules.excludes(s));
        self.result.replace(Some(result));
    }

    fn sequencing(&self) -> Sequencing {
        self.result
            .borrow()
            .clone()
            .expect("sequencing should have run")
            .expect("sequencing should succeed")
    }
}

#[fixture]
fn world() -> SequencerWorld {
    SequencerWorld::default()
}

#[given("stops east of the depot at one, five and ten degrees")]
fn given_line(world: &SequencerWorld) {
    world.stops.replace(vec![
        stop(10, 0.0, 10.0),
        stop(1, 0.0, 1.0),
        stop(5, 0.0, 5.0),
    ]);
}

#[given("stops along a line with the protected stop closest to the depot")]
fn given_protected(world: &SequencerWorld) {
    world.stops.replace(vec![
        stop(2, 0.0, 2.0),
        stop(PROTECTED, 0.0, 0.1),
        stop(1, 0.0, 1.0),
    ]);
}

#[given("stops where one has no coordinates")]
fn given_missing_coordinates(world: &SequencerWorld) {
    world.stops.replace(vec![
        stop(1, 0.0, 1.0),
        stop(7, f64::NAN, f64::NAN),
        stop(2, 0.0, 2.0),
    ]);
}

#[given("no stops")]
fn given_empty(world: &SequencerWorld) {
    world.stops.replace(Vec::new());
}

#[when("the stops are sequenced from the depot")]
fn when_sequenced(world: &SequencerWorld) {
    world.run(DEPOT, &ExclusionRules::default());
}

#[when("the stops are sequenced with the protected stop excluded")]
fn when_sequenced_protected(world: &SequencerWorld) {
    world.run(DEPOT, &ExclusionRules::default().with_protected(PROTECTED));
}

#[when("the stops are sequenced from a depot without coordinates")]
fn when_sequenced_invalid(world: &SequencerWorld) {
    world.run(
        Coord {
            x: f64::NAN,
            y: f64::NAN,
        },
        &ExclusionRules::default(),
    );
}

#[then("the visiting order is nearest first")]
fn then_nearest_first(world: &SequencerWorld) {
    assert_eq!(world.sequencing().ids(), vec![1, 5, 10]);
}

#[then("every sequenced stop carries a contiguous index")]
fn then_contiguous(world: &SequencerWorld) {
    let indexed = world
        .sequencing()
        .into_indexed()
        .expect("indices in range");
    assert_eq!(indices(&indexed), vec![Some(1), Some(2), Some(3)]);
}

#[then("the protected stop does not appear in the order")]
fn then_protected_absent(world: &SequencerWorld) {
    let sequencing = world.sequencing();
    assert_eq!(sequencing.ids(), vec![1, 2]);
    assert!(sequencing.skipped.is_empty());
}

#[then("the stop without coordinates is reported as skipped")]
fn then_skipped(world: &SequencerWorld) {
    assert_eq!(world.sequencing().skipped, vec![7]);
}

#[then("the remaining stops are still sequenced")]
fn then_remaining(world: &SequencerWorld) {
    assert_eq!(ids(&world.sequencing().order), vec![1, 2]);
}

#[then("the visiting order is empty")]
fn then_empty(world: &SequencerWorld) {
    assert_eq!(world.sequencing(), Sequencing::default());
}

#[then("sequencing fails with an invalid reference error")]
fn then_invalid_reference(world: &SequencerWorld) {
    let result = world.result.borrow();
    assert!(matches!(
        result.as_ref(),
        Some(Err(SequenceError::InvalidReference { .. }))
    ));
}

#[scenario(path = "tests/features/sequencer.feature", index = 0)]
fn nearest_first(world: SequencerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sequencer.feature", index = 1)]
fn protected_stop_excluded(world: SequencerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sequencer.feature", index = 2)]
fn missing_location_skipped(world: SequencerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sequencer.feature", index = 3)]
fn empty_route(world: SequencerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sequencer.feature", index = 4)]
fn invalid_reference(world: SequencerWorld) {
    let _ = world;
}
