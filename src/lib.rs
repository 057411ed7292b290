//! Facade crate for the Stopwise route sequencing engine.
//!
//! This crate re-exports the core domain types and algorithms, and exposes the
//! SQLite sequence store behind the `store-sqlite` feature.

#![forbid(unsafe_code)]

pub use stopwise_core::{
    ContiguityError, DEFAULT_CYCLE_LIMIT, Direction, ExclusionRules, IndexUpdate,
    MemorySequenceStore, MemoryStoreError, ReorderOutcome, RouteService, RouteServiceError,
    SequenceError, SequenceIndex, SequenceIndexError, SequenceStore, Sequencing,
    SequencingReport, ServiceArea, Stop, StopStatus, Waypoint, check_contiguous, index_updates,
    plan_waypoints, reorder_adjacent, route_distance_km, sequence,
};

#[cfg(feature = "store-sqlite")]
pub use stopwise_core::{SqliteSequenceStore, SqliteSequenceStoreError};
