//! Route length reporting and map waypoint planning.
//!
//! Nothing here influences the order of stops. Distances are great-circle
//! kilometres, suitable for showing to a dispatcher.

use geo::Coord;

use crate::{Stop, haversine_km, is_valid_coord};

/// Stops a driver serves before the planned map route returns to the depot.
pub const DEFAULT_CYCLE_LIMIT: usize = 10;

/// Great-circle length of `origin → stops… → return_to`, in kilometres.
///
/// Points without a finite location are skipped. Fewer than two usable points
/// yield zero.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stopwise_core::route_distance_km;
///
/// let origin = Coord { x: 0.0, y: 0.0 };
/// assert_eq!(route_distance_km(origin, &[], None), 0.0);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "leg lengths are summed")]
pub fn route_distance_km(origin: Coord<f64>, stops: &[Stop], return_to: Option<Coord<f64>>) -> f64 {
    let points: Vec<Coord<f64>> = std::iter::once(origin)
        .chain(stops.iter().map(|stop| stop.location))
        .chain(return_to)
        .filter(|coord| is_valid_coord(*coord))
        .collect();

    points
        .windows(2)
        .map(|leg| match leg {
            [from, to] => haversine_km(*from, *to),
            _ => 0.0,
        })
        .sum()
}

/// A point the map route passes through.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Waypoint {
    /// A delivery stop.
    Stop {
        /// Stop identifier.
        id: u64,
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lng: f64,
    },
    /// An intermediate return to the depot.
    Depot {
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lng: f64,
    },
}

impl Waypoint {
    /// Position of the waypoint.
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        match *self {
            Self::Stop { lat, lng, .. } | Self::Depot { lat, lng } => Coord { x: lng, y: lat },
        }
    }

    const fn depot(location: Coord<f64>) -> Self {
        Self::Depot {
            lat: location.y,
            lng: location.x,
        }
    }
}

impl From<&Stop> for Waypoint {
    fn from(stop: &Stop) -> Self {
        Self::Stop {
            id: stop.id,
            lat: stop.lat(),
            lng: stop.lng(),
        }
    }
}

/// Intermediate waypoints for drawing an ordered route on a map.
///
/// When the route holds more than `cycle_limit` stops, one depot return is
/// inserted after the first `cycle_limit` of them. A `cycle_limit` of zero
/// disables the rule. Sequence indices are unaffected; the depot is a drawing
/// aid only.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stopwise_core::test_support::stop;
/// use stopwise_core::{Waypoint, plan_waypoints};
///
/// let depot = Coord { x: -48.5, y: -27.6 };
/// let stops = vec![stop(1, 0.0, 0.0), stop(2, 0.0, 1.0), stop(3, 0.0, 2.0)];
/// let waypoints = plan_waypoints(&stops, depot, 2);
/// assert_eq!(waypoints.len(), 4);
/// assert!(matches!(waypoints[2], Waypoint::Depot { .. }));
/// ```
#[must_use]
pub fn plan_waypoints(stops: &[Stop], depot: Coord<f64>, cycle_limit: usize) -> Vec<Waypoint> {
    let mut waypoints: Vec<Waypoint> = stops.iter().map(Waypoint::from).collect();
    if cycle_limit > 0 && stops.len() > cycle_limit {
        waypoints.insert(cycle_limit, Waypoint::depot(depot));
    }
    waypoints
}
