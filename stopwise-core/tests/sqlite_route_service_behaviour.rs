//! Behavioural tests for `RouteService` over `SqliteSequenceStore` using
//! rstest-bdd.

use std::cell::RefCell;
use std::path::PathBuf;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use stopwise_core::test_support::{ids, indexed, indices, stop, stop_with_status};
use stopwise_core::{
    Direction, ExclusionRules, RouteService, SequenceIndex, SequenceStore, SqliteSequenceStore,
    StopStatus,
};
use tempfile::TempDir;

const ROUTE: u64 = 7;
const PROTECTED: u64 = 349;
const DEPOT: Coord<f64> = Coord {
    x: -48.55,
    y: -27.59,
};

#[derive(Debug)]
struct RouteWorld {
    temp_dir: TempDir,
    service: RefCell<Option<RouteService<SqliteSequenceStore>>>,
    skipped: RefCell<Vec<u64>>,
}

impl RouteWorld {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
            service: RefCell::new(None),
            skipped: RefCell::new(Vec::new()),
        }
    }

    fn db_path(&self) -> PathBuf {
        self.temp_dir.path().join("stops.db")
    }

    fn rules() -> ExclusionRules {
        ExclusionRules::default().with_protected(PROTECTED)
    }

    fn with_service<T>(&self, f: impl FnOnce(&mut RouteService<SqliteSequenceStore>) -> T) -> T {
        let mut borrowed = self.service.borrow_mut();
        let service = borrowed
            .as_mut()
            .expect("database should be initialised first");
        f(service)
    }

    fn reopen(&self) -> SqliteSequenceStore {
        // Release the writer before reopening from disk.
        self.service.replace(None);
        SqliteSequenceStore::open(self.db_path()).expect("reopen database")
    }

    fn seed(&self, stops: &[stopwise_core::Stop]) {
        let mut store = SqliteSequenceStore::open(self.db_path()).expect("open database");
        for s in stops {
            store.insert_stop(ROUTE, s).expect("insert stop");
        }
        self.service.replace(Some(RouteService::new(store)));
    }
}

#[fixture]
fn world() -> RouteWorld {
    RouteWorld::new()
}

#[given("a SQLite stop database with a mixed route")]
fn given_mixed_route(world: &RouteWorld) {
    world.seed(&[
        stop(3, -27.59, -48.40),
        stop(1, -27.59, -48.50),
        stop_with_status(4, -27.59, -48.45, StopStatus::Delivered),
        stop(PROTECTED, -27.59, -48.54),
        stop_with_status(2, -27.59, -48.45, StopStatus::InRoute),
    ]);
}

#[given("a SQLite stop database with a sequenced protected stop")]
fn given_sequenced(world: &RouteWorld) {
    world.seed(&[indexed(1, 1), indexed(PROTECTED, 2), indexed(2, 3)]);
}

#[given("a SQLite stop database with an ungeocoded stop holding index 1")]
fn given_ungeocoded(world: &RouteWorld) {
    world.seed(&[
        stop(5, f64::NAN, f64::NAN).with_sequence_index(SequenceIndex::FIRST),
        stop(1, -27.59, -48.50),
        stop(2, -27.59, -48.45),
    ]);
}

#[when("the route is resequenced from the depot")]
fn when_resequenced(world: &RouteWorld) {
    let rules = RouteWorld::rules();
    let report = world
        .with_service(|service| service.resequence(ROUTE, DEPOT, |s| rules.excludes(s)))
        .expect("resequence");
    world.skipped.replace(report.skipped);
}

#[when("the first stop is moved down")]
fn when_moved(world: &RouteWorld) {
    let rules = RouteWorld::rules();
    let outcome = world
        .with_service(|service| service.move_stop(ROUTE, 1, Direction::Down, |s| rules.excludes(s)))
        .expect("move stop");
    assert!(outcome.is_moved());
}

#[when("every index except the protected stop is cleared")]
fn when_cleared(world: &RouteWorld) {
    let cleared = world
        .with_service(|service| service.clear(ROUTE, |s| s.id == PROTECTED))
        .expect("clear");
    assert_eq!(cleared, 2);
}

#[then("the reopened database lists the active stops in nearest order")]
fn then_nearest_order(world: &RouteWorld) {
    let route = world.reopen().load_route(ROUTE).expect("load route");
    let sequenced: Vec<_> = route
        .iter()
        .filter(|s| s.sequence_index.is_some())
        .cloned()
        .collect();
    assert_eq!(ids(&sequenced), vec![1, 2, 3]);
    assert_eq!(indices(&sequenced), vec![Some(1), Some(2), Some(3)]);
}

#[then("no stop is reported as skipped")]
fn then_none_skipped(world: &RouteWorld) {
    assert!(world.skipped.borrow().is_empty());
}

#[then("the ungeocoded stop is reported as skipped")]
fn then_ungeocoded_skipped(world: &RouteWorld) {
    assert_eq!(*world.skipped.borrow(), vec![5]);
}

#[then("the reopened database holds indices 1 and 2 without duplicates")]
fn then_no_duplicates(world: &RouteWorld) {
    let route = world.reopen().load_route(ROUTE).expect("load route");
    assert_eq!(ids(&route), vec![1, 2, 5]);
    assert_eq!(indices(&route), vec![Some(1), Some(2), None]);
}

#[then("delivered and protected stops keep no index")]
fn then_unsequenced(world: &RouteWorld) {
    let store = world.reopen();
    for id in [4, PROTECTED] {
        let found = store.find_stop(id).expect("query").expect("stop exists");
        assert!(found.sequence_index.is_none(), "stop {id} should be unsequenced");
    }
}

#[then("the reopened database lists the first two stops swapped")]
fn then_swapped(world: &RouteWorld) {
    let route = world.reopen().load_route(ROUTE).expect("load route");
    let sequenced: Vec<_> = route
        .iter()
        .filter(|s| s.sequence_index.is_some())
        .cloned()
        .collect();
    assert_eq!(ids(&sequenced), vec![2, 1, 3]);
    assert_eq!(indices(&sequenced), vec![Some(1), Some(2), Some(3)]);
}

#[then("only the protected stop keeps its index")]
fn then_protected_kept(world: &RouteWorld) {
    let route = world.reopen().load_route(ROUTE).expect("load route");
    assert_eq!(ids(&route), vec![PROTECTED, 1, 2]);
    assert_eq!(indices(&route), vec![Some(2), None, None]);
}

#[scenario(path = "tests/features/sqlite_route_service.feature", index = 0)]
fn resequence_persists(world: RouteWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_route_service.feature", index = 1)]
fn move_persists(world: RouteWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_route_service.feature", index = 2)]
fn clear_spares_protected(world: RouteWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_route_service.feature", index = 3)]
fn resequence_clears_skipped(world: RouteWorld) {
    let _ = world;
}
