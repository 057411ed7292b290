//! Test helpers for writing stop lists into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Temporary directory holding a stops file.
#[derive(Debug)]
pub(super) struct StopsWorkspace {
    _tmp: TempDir,
    pub(super) root: Utf8PathBuf,
    pub(super) stops_path: Utf8PathBuf,
}

impl StopsWorkspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        let stops_path = root.join("stops.json");
        Self {
            _tmp: tmp,
            root,
            stops_path,
        }
    }

    pub(super) fn with_stops(json: &str) -> Self {
        let workspace = Self::new();
        write_utf8(&workspace.stops_path, json.as_bytes());
        workspace
    }
}

/// Four stops east of the depot at (0, 0); stop 4 has been delivered, stop 2
/// carries its coordinates as strings, and stops 5 and 6 were never geocoded.
pub(super) const LINE_OF_STOPS: &str = r#"[
  {"id": 3, "lat": 0.0, "lng": 3.0},
  {"id": 1, "lat": 0.0, "lng": 1.0, "status": "in_route"},
  {"id": 4, "lat": 0.0, "lng": 0.5, "status": "delivered"},
  {"id": 5, "lat": null, "lng": null},
  {"id": 6, "lat": "unknown", "lng": "2.5"},
  {"id": 2, "lat": "0.0", "lng": "2.0"}
]"#;

/// A route already numbered 1..=3.
pub(super) const SEQUENCED_ROUTE: &str = r#"[
  {"id": 10, "lat": 0.0, "lng": 1.0, "sequence_index": 1},
  {"id": 20, "lat": 0.0, "lng": 2.0, "sequence_index": 2},
  {"id": 30, "lat": 0.0, "lng": 3.0, "sequence_index": 3}
]"#;
