//! Distances between coordinates.
//!
//! Route ordering compares planar squared distances on raw degrees. The
//! great-circle helper exists for reporting route lengths to people and must
//! not feed back into ordering.

use geo::{Coord, Distance, Haversine, Point};

/// Return `true` when both components of `coord` are finite.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stopwise_core::is_valid_coord;
///
/// assert!(is_valid_coord(Coord { x: -48.5, y: -27.6 }));
/// assert!(!is_valid_coord(Coord { x: f64::NAN, y: 0.0 }));
/// ```
#[must_use]
pub const fn is_valid_coord(coord: Coord<f64>) -> bool {
    coord.x.is_finite() && coord.y.is_finite()
}

/// Planar squared distance between two coordinates, in squared degrees.
///
/// Only the relative order of results is meaningful. The square root is
/// skipped because it does not change that order.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stopwise_core::squared_distance;
///
/// let a = Coord { x: 0.0, y: 0.0 };
/// let b = Coord { x: 3.0, y: 4.0 };
/// assert_eq!(squared_distance(a, b), 25.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "distance comparison requires floating-point arithmetic"
)]
pub fn squared_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let d_lat = b.y - a.y;
    let d_lng = b.x - a.x;
    d_lat * d_lat + d_lng * d_lng
}

/// Great-circle distance between two coordinates in kilometres.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "metres are converted to kilometres"
)]
pub fn haversine_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(a), Point::from(b)) / 1000.0
}
