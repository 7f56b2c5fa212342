//! Per-user coverage session.
//!
//! A [`CoverageSession`] owns the user's [`LocationState`] and the last
//! computed coverage. Location updates flow through
//! [`on_location`](CoverageSession::on_location), which only filters and
//! rebuilds the [`ViewModel`] when the reconciler reports a material
//! move.

use crate::coverage::coverage_types::{
    feature::PolygonFeature,
    point::{LocationUpdate, Point, PointError},
};
use crate::coverage::coverage_utils::{
    loader::{Dataset, LoadError},
    proximity::{self, ProximityMode, ProximityTest, DEFAULT_RADIUS_KM},
    reconciler::{LocationState, Reconciler, DEFAULT_EPSILON_DEG},
    view_model::{self, ViewModel},
};
use std::sync::Arc;

/// Settings a session is created with.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SessionSettings {
    /// Center used until a sensor reports a location.
    pub default_location: Point,

    /// Proximity cutoff in kilometers.
    pub radius_km: f64,

    /// Jitter suppression threshold in decimal degrees.
    pub epsilon_deg: f64,

    /// Which proximity test to use.
    pub proximity_mode: ProximityMode,
}

impl SessionSettings {
    /// Default radius, epsilon and proximity mode around `default_location`.
    pub fn new(default_location: Point) -> Self {
        SessionSettings {
            default_location,
            radius_km: DEFAULT_RADIUS_KM,
            epsilon_deg: DEFAULT_EPSILON_DEG,
            proximity_mode: ProximityMode::default(),
        }
    }
}

/// Indices of the matching features, computed for `center`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageResult {
    /// Center the result was computed for.
    pub center: Point,

    /// Matching feature indices, in collection order.
    pub indices: Vec<usize>,
}

/// Outcome of feeding a location into a session.
#[derive(Debug, PartialEq)]
pub enum SessionUpdate<'a> {
    /// Nothing changed, the previous view model is still current.
    Unchanged,

    /// The location moved and the view model was rebuilt.
    Refreshed(&'a ViewModel),
}

/// One user's view of the coverage dataset.
pub struct CoverageSession {
    dataset: Arc<Dataset>,
    reconciler: Reconciler,
    state: LocationState,
    radius_km: f64,
    test: Box<dyn ProximityTest>,
    result: CoverageResult,
    view: ViewModel,
}

impl std::fmt::Debug for CoverageSession {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("CoverageSession")
            .field("state", &self.state)
            .field("radius_km", &self.radius_km)
            .field("features", &self.dataset.collection.len())
            .field("matches", &self.result.indices.len())
            .finish()
    }
}

impl CoverageSession {
    /// Starts a session at the default location and computes the first
    /// view model.
    pub fn new(dataset: Arc<Dataset>, settings: SessionSettings) -> Self {
        session_info!(
            "(new) Starting session at {} with radius {} km ({} proximity).",
            settings.default_location,
            settings.radius_km,
            settings.proximity_mode
        );

        if let Some(notice) = &dataset.notice {
            session_warn!("(new) Dataset unavailable: {}.", notice);
        }

        let state = LocationState::new(settings.default_location);
        let test = settings.proximity_mode.test();
        let center = state.center();
        let indices =
            proximity::filter_indices(&dataset.collection, &center, settings.radius_km, &*test);
        let view = Self::build_view(&dataset, center, settings.radius_km, &indices);

        CoverageSession {
            dataset,
            reconciler: Reconciler::new(settings.epsilon_deg),
            state,
            radius_km: settings.radius_km,
            test,
            result: CoverageResult { center, indices },
            view,
        }
    }

    /// Feeds a validated location into the session.
    pub fn on_location(&mut self, candidate: Point) -> SessionUpdate<'_> {
        self.state = self.reconciler.update(self.state, candidate);
        if !self.state.is_dirty() {
            session_debug!(
                "(on_location) Ignoring {}, within {} deg of {}.",
                candidate,
                self.reconciler.epsilon_deg(),
                self.state.center()
            );
            return SessionUpdate::Unchanged;
        }

        self.refresh();
        self.state.mark_consumed();

        SessionUpdate::Refreshed(&self.view)
    }

    /// Validates a raw sensor reading, then feeds it into the session.
    pub fn on_location_update(
        &mut self,
        update: LocationUpdate,
    ) -> Result<SessionUpdate<'_>, PointError> {
        let candidate = Point::try_from(update).map_err(|e| {
            session_warn!("(on_location_update) Rejecting sensor reading: {}.", e);
            e
        })?;

        Ok(self.on_location(candidate))
    }

    /// Records a sensor failure. The current location stays in effect.
    pub fn on_sensor_failure(&self, reason: &str) {
        session_warn!(
            "(on_sensor_failure) Location unavailable ({}); keeping {}.",
            reason,
            self.state.center()
        );
    }

    fn refresh(&mut self) {
        let center = self.state.center();
        if self.result.center == center {
            session_debug!("(refresh) Reusing coverage computed for {}.", center);
            return;
        }

        let indices = proximity::filter_indices(
            &self.dataset.collection,
            &center,
            self.radius_km,
            &*self.test,
        );
        session_info!(
            "(refresh) {} coverage areas within {} km of {}.",
            indices.len(),
            self.radius_km,
            center
        );

        self.view = Self::build_view(&self.dataset, center, self.radius_km, &indices);
        self.result = CoverageResult { center, indices };
    }

    fn build_view(
        dataset: &Dataset,
        center: Point,
        radius_km: f64,
        indices: &[usize],
    ) -> ViewModel {
        view_model::build(
            center,
            radius_km,
            indices.iter().map(|&i| &dataset.collection.features[i]),
        )
    }

    /// Current location state.
    pub fn state(&self) -> &LocationState {
        &self.state
    }

    /// Last computed coverage.
    pub fn result(&self) -> &CoverageResult {
        &self.result
    }

    /// Last built view model.
    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    /// Matching features for the current location.
    pub fn matches(&self) -> Vec<&PolygonFeature> {
        self.result
            .indices
            .iter()
            .map(|&i| &self.dataset.collection.features[i])
            .collect()
    }

    /// Dataset level load failure, if the session runs on an empty dataset
    /// because of one.
    pub fn notice(&self) -> Option<&LoadError> {
        self.dataset.notice.as_ref()
    }
}
