//! Delivery stops and their lifecycle status.

use std::fmt;
use std::str::FromStr;

use geo::Coord;
use thiserror::Error;

use crate::{SequenceIndex, is_valid_coord};

/// Lifecycle state of a stop.
///
/// Transitions belong to the dispatch system. The sequencer only reads the
/// status to decide whether a stop is part of the active working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum StopStatus {
    /// Waiting to be assigned or dispatched.
    #[default]
    Pending,
    /// Assigned to a driver who is on the road.
    InRoute,
    /// Handed over to the recipient.
    Delivered,
    /// The delivery attempt failed.
    Failed,
}

impl StopStatus {
    /// Whether the stop still takes part in route sequencing.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::InRoute)
    }

    /// Stable textual form used in storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InRoute => "in_route",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for StopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stop status {value:?}")]
pub struct ParseStopStatusError {
    /// The rejected input.
    pub value: String,
}

impl FromStr for StopStatus {
    type Err = ParseStopStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in_route" | "in-route" => Ok(Self::InRoute),
            "delivered" => Ok(Self::Delivered),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseStopStatusError {
                value: s.to_owned(),
            }),
        }
    }
}

/// A delivery or pickup task at a geographic location.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. A stop whose
/// location is not finite is never sequenced.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stopwise_core::{Stop, StopStatus};
///
/// let stop = Stop::pending(7, Coord { x: -48.55, y: -27.59 });
/// assert_eq!(stop.status, StopStatus::Pending);
/// assert!(stop.sequence_index.is_none());
/// assert!(stop.has_valid_location());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "StopRecord", into = "StopRecord")
)]
pub struct Stop {
    /// Opaque identifier, stable across reorders.
    pub id: u64,
    /// Geographic position.
    pub location: Coord<f64>,
    /// Lifecycle state.
    pub status: StopStatus,
    /// Position within the route, if sequenced.
    pub sequence_index: Option<SequenceIndex>,
}

impl Stop {
    /// Construct an unsequenced stop.
    #[must_use]
    pub const fn new(id: u64, location: Coord<f64>, status: StopStatus) -> Self {
        Self {
            id,
            location,
            status,
            sequence_index: None,
        }
    }

    /// Construct an unsequenced pending stop.
    #[must_use]
    pub const fn pending(id: u64, location: Coord<f64>) -> Self {
        Self::new(id, location, StopStatus::Pending)
    }

    /// Return the stop with `index` assigned.
    #[must_use]
    pub fn with_sequence_index(mut self, index: SequenceIndex) -> Self {
        self.sequence_index = Some(index);
        self
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.location.x
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub const fn has_valid_location(&self) -> bool {
        is_valid_coord(self.location)
    }
}

/// Wire form of a [`Stop`]: flat `lat`/`lng` fields, either of which may be
/// missing or `null` for stops that were never geocoded.
///
/// Coordinates are accepted as numbers or numeric strings. Any other string
/// reads as a missing coordinate, so the stop is skipped by the sequencer
/// rather than failing the whole batch.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct StopRecord {
    id: u64,
    #[serde(default, deserialize_with = "coordinate")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "coordinate")]
    lng: Option<f64>,
    #[serde(default)]
    status: StopStatus,
    #[serde(default)]
    sequence_index: Option<SequenceIndex>,
}

#[cfg(feature = "serde")]
fn coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum RawCoordinate {
        Number(f64),
        Text(String),
    }

    let raw = <Option<RawCoordinate> as serde::Deserialize>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawCoordinate::Number(value)) => Some(value),
        Some(RawCoordinate::Text(text)) => text.trim().parse::<f64>().ok(),
        None => None,
    })
}

#[cfg(feature = "serde")]
impl From<StopRecord> for Stop {
    fn from(record: StopRecord) -> Self {
        Self {
            id: record.id,
            location: Coord {
                x: record.lng.unwrap_or(f64::NAN),
                y: record.lat.unwrap_or(f64::NAN),
            },
            status: record.status,
            sequence_index: record.sequence_index,
        }
    }
}

#[cfg(feature = "serde")]
impl From<Stop> for StopRecord {
    fn from(stop: Stop) -> Self {
        Self {
            id: stop.id,
            lat: stop.location.y.is_finite().then_some(stop.location.y),
            lng: stop.location.x.is_finite().then_some(stop.location.x),
            status: stop.status,
            sequence_index: stop.sequence_index,
        }
    }
}
