//! Reconciles incoming location updates with the effective user location.
//!
//! A [`LocationState`] is either stable or dirty. An update moves it to
//! dirty only when the candidate differs from the current center by more
//! than `epsilon_deg` on either axis; sensor jitter below that is
//! dropped. Dirty is cleared by [`LocationState::mark_consumed`] once the
//! coverage result has been refreshed for the new center.

use crate::coverage::coverage_types::point::Point;
use serde::Serialize;

/// Default significance threshold, roughly 10 m.
pub const DEFAULT_EPSILON_DEG: f64 = 0.0001;

/// The effective user location of one session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct LocationState {
    center: Point,
    dirty: bool,
}

impl LocationState {
    /// Initial state: stable, at the configured default location.
    pub fn new(default_location: Point) -> Self {
        LocationState {
            center: default_location,
            dirty: false,
        }
    }

    /// Current effective location.
    pub fn center(&self) -> Point {
        self.center
    }

    /// `true` while a recompute for [`center`](Self::center) is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the current center as consumed by a recompute.
    pub fn mark_consumed(&mut self) {
        self.dirty = false;
    }
}

/// Applies the significance threshold to location updates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Reconciler {
    epsilon_deg: f64,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON_DEG)
    }
}

impl Reconciler {
    /// Creates a reconciler. Negative or non-finite thresholds are
    /// treated as zero, so every distinct point is significant.
    pub fn new(epsilon_deg: f64) -> Self {
        let epsilon_deg = if epsilon_deg.is_finite() && epsilon_deg > 0.0 {
            epsilon_deg
        } else {
            0.0
        };

        Reconciler { epsilon_deg }
    }

    /// The threshold in decimal degrees.
    pub fn epsilon_deg(&self) -> f64 {
        self.epsilon_deg
    }

    /// `true` when `candidate` is a material change from `current`.
    pub fn is_significant(&self, current: &Point, candidate: &Point) -> bool {
        (candidate.latitude() - current.latitude()).abs() > self.epsilon_deg
            || (candidate.longitude() - current.longitude()).abs() > self.epsilon_deg
    }

    /// Returns the state after applying `candidate`.
    ///
    /// A significant candidate replaces the center and marks the state
    /// dirty. Anything else leaves the state untouched, including a
    /// dirty flag that has not been consumed yet.
    pub fn update(&self, current: LocationState, candidate: Point) -> LocationState {
        if !self.is_significant(&current.center, &candidate) {
            return current;
        }

        LocationState {
            center: candidate,
            dirty: true,
        }
    }
}
