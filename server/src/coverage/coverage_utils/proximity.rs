//! Selects the coverage polygons that are close to a center point.
//!
//! The test that decides "close" sits behind [`ProximityTest`] so that
//! callers of [`filter`] do not change when the geometry gets more
//! precise. Holes are never consulted.

use super::haversine;
use crate::coverage::coverage_types::{
    feature::{FeatureCollection, PolygonFeature},
    point::Point,
};
use geo::{Closest, Contains, Coord, HaversineClosestPoint, LineString, Polygon};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Search radius used when the caller does not pick one.
pub const DEFAULT_RADIUS_KM: f64 = 20.0;

/// Decides whether a single feature is within `radius_km` of `center`.
///
/// Implementations must treat the boundary as inclusive and must return
/// `false`, not panic, for features they can not evaluate.
pub trait ProximityTest: Send + Sync {
    /// `true` when `feature` is within `radius_km` of `center`.
    fn is_near(&self, feature: &PolygonFeature, center: &Point, radius_km: f64) -> bool;
}

/// Coarse test: a feature is near as soon as one outer ring vertex is
/// within the radius. Cost is linear in the number of vertices.
#[derive(Debug, Default, Copy, Clone)]
pub struct VertexProximity;

impl ProximityTest for VertexProximity {
    fn is_near(&self, feature: &PolygonFeature, center: &Point, radius_km: f64) -> bool {
        feature
            .outer_ring
            .iter()
            .any(|vertex| haversine::distance(center, vertex) <= radius_km)
    }
}

/// Precise test: a feature is near when the center is inside the outer
/// ring, or when the closest point on the ring's edges is within the
/// radius.
#[derive(Debug, Default, Copy, Clone)]
pub struct BoundaryProximity;

impl ProximityTest for BoundaryProximity {
    fn is_near(&self, feature: &PolygonFeature, center: &Point, radius_km: f64) -> bool {
        if !feature.has_valid_ring() {
            return false;
        }

        let exterior: LineString<f64> = feature
            .outer_ring
            .iter()
            .map(|p| Coord {
                x: p.longitude(),
                y: p.latitude(),
            })
            .collect();
        let target: geo::Point<f64> = (*center).into();

        let polygon = Polygon::new(exterior, vec![]);
        if polygon.contains(&target) {
            return true;
        }

        match polygon.exterior().haversine_closest_point(&target) {
            Closest::Intersection(closest) | Closest::SinglePoint(closest) => {
                match Point::new(closest.y(), closest.x()) {
                    Ok(closest) => haversine::distance(center, &closest) <= radius_km,
                    Err(_) => VertexProximity.is_near(feature, center, radius_km),
                }
            }
            Closest::Indeterminate => VertexProximity.is_near(feature, center, radius_km),
        }
    }
}

/// Available proximity tests.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ProximityMode {
    /// [`VertexProximity`]
    #[default]
    Vertex,

    /// [`BoundaryProximity`]
    Boundary,
}

impl ProximityMode {
    /// Boxed test for this mode.
    pub fn test(self) -> Box<dyn ProximityTest> {
        match self {
            ProximityMode::Vertex => Box::new(VertexProximity),
            ProximityMode::Boundary => Box::new(BoundaryProximity),
        }
    }
}

impl FromStr for ProximityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertex" => Ok(ProximityMode::Vertex),
            "boundary" => Ok(ProximityMode::Boundary),
            other => Err(format!("Unknown proximity mode: {}", other)),
        }
    }
}

impl Display for ProximityMode {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            ProximityMode::Vertex => write!(f, "vertex"),
            ProximityMode::Boundary => write!(f, "boundary"),
        }
    }
}

/// Indices of the features near `center`, in collection order.
///
/// Features without a usable outer ring are skipped.
pub fn filter_indices(
    collection: &FeatureCollection,
    center: &Point,
    radius_km: f64,
    test: &dyn ProximityTest,
) -> Vec<usize> {
    let indices: Vec<usize> = collection
        .iter()
        .enumerate()
        .filter(|(index, feature)| {
            if !feature.has_valid_ring() {
                filter_debug!(
                    "(filter_indices) Skipping feature [{}] without a usable outer ring.",
                    index
                );
                return false;
            }
            test.is_near(feature, center, radius_km)
        })
        .map(|(index, _)| index)
        .collect();

    filter_debug!(
        "(filter_indices) {} of {} features within {} km of {}.",
        indices.len(),
        collection.len(),
        radius_km,
        center
    );

    indices
}

/// Features near `center`, in collection order.
pub fn filter<'a>(
    collection: &'a FeatureCollection,
    center: &Point,
    radius_km: f64,
    test: &dyn ProximityTest,
) -> Vec<&'a PolygonFeature> {
    filter_indices(collection, center, radius_km, test)
        .into_iter()
        .map(|index| &collection.features[index])
        .collect()
}

/// [`filter`] with [`DEFAULT_RADIUS_KM`] and [`VertexProximity`].
pub fn filter_default<'a>(
    collection: &'a FeatureCollection,
    center: &Point,
) -> Vec<&'a PolygonFeature> {
    filter(collection, center, DEFAULT_RADIUS_KM, &VertexProximity)
}
