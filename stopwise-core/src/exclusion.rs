//! Business rules that keep stops out of automatic sequencing.
//!
//! The sequencer accepts any `Fn(&Stop) -> bool`; [`ExclusionRules`] bundles
//! the rules dispatchers configure most often so callers do not hardcode them.

use geo::{Coord, Intersects, Rect};

use crate::Stop;

/// Rectangular region in which stops may be routed.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stopwise_core::ServiceArea;
///
/// let area = ServiceArea::new(Coord { x: -54.0, y: -30.0 }, Coord { x: -48.0, y: -25.0 });
/// assert!(area.contains(Coord { x: -48.5, y: -27.6 }));
/// assert!(!area.contains(Coord { x: -43.2, y: -22.9 }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceArea {
    bounds: Rect<f64>,
}

impl ServiceArea {
    /// Build an area from two opposite corners, in any order.
    #[must_use]
    pub fn new(corner: Coord<f64>, opposite: Coord<f64>) -> Self {
        Self {
            bounds: Rect::new(corner, opposite),
        }
    }

    /// The normalised bounding rectangle.
    #[must_use]
    pub const fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    /// Whether `coord` lies inside the area. Boundary points count as inside.
    #[must_use]
    pub fn contains(&self, coord: Coord<f64>) -> bool {
        self.bounds.intersects(&coord)
    }
}

/// Configurable exclusion predicate for sequencing and bulk clearing.
///
/// By default only inactive stops (delivered or failed) are excluded.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stopwise_core::{ExclusionRules, Stop, StopStatus};
///
/// let rules = ExclusionRules::default().with_protected(349);
/// let origin = Coord { x: 0.0, y: 0.0 };
///
/// assert!(rules.excludes(&Stop::pending(349, origin)));
/// assert!(rules.excludes(&Stop::new(1, origin, StopStatus::Delivered)));
/// assert!(!rules.excludes(&Stop::pending(2, origin)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExclusionRules {
    /// Stop that must never be sequenced or cleared.
    pub protected: Option<u64>,
    /// Exclude stops that are no longer pending or in route.
    pub active_only: bool,
    /// Exclude stops located outside this area.
    pub service_area: Option<ServiceArea>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            protected: None,
            active_only: true,
            service_area: None,
        }
    }
}

impl ExclusionRules {
    /// Protect the stop with `id`.
    #[must_use]
    pub const fn with_protected(mut self, id: u64) -> Self {
        self.protected = Some(id);
        self
    }

    /// Keep delivered and failed stops in the working set.
    #[must_use]
    pub const fn including_inactive(mut self) -> Self {
        self.active_only = false;
        self
    }

    /// Restrict routing to `area`.
    #[must_use]
    pub const fn with_service_area(mut self, area: ServiceArea) -> Self {
        self.service_area = Some(area);
        self
    }

    /// Whether `stop` is the protected stop.
    #[must_use]
    pub fn is_protected(&self, stop: &Stop) -> bool {
        self.protected == Some(stop.id)
    }

    /// Whether `stop` must be left out of sequencing.
    ///
    /// Stops without a valid location are never excluded by area so that the
    /// sequencer can report them for geocoding.
    #[must_use]
    pub fn excludes(&self, stop: &Stop) -> bool {
        if self.is_protected(stop) {
            return true;
        }
        if self.active_only && !stop.status.is_active() {
            return true;
        }
        self.service_area
            .is_some_and(|area| stop.has_valid_location() && !area.contains(stop.location))
    }
}
