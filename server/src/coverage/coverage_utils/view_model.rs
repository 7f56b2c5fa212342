//! Render-ready description of the coverage map.
//!
//! The [`ViewModel`] is the only thing handed to a map renderer. It is
//! serializable and uses GeoJSON `[longitude, latitude]` order for
//! polygon coordinates, since that is what map widgets consume.

use crate::coverage::coverage_types::{feature::PolygonFeature, point::Point};
use serde::Serialize;

/// Marker placed at the user's location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserMarker {
    /// Marker position.
    pub position: Point,

    /// Tooltip text.
    pub label: String,
}

/// Search radius drawn around the user.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct RadiusCircle {
    /// Circle center.
    pub center: Point,

    /// Radius in kilometers.
    pub radius_km: f64,
}

/// One polygon to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonDescriptor {
    /// Text shown on the polygon.
    pub label: String,

    /// Outer ring as `[longitude, latitude]` pairs.
    pub outer_ring: Vec<[f64; 2]>,

    /// Holes as `[longitude, latitude]` pairs.
    pub holes: Vec<Vec<[f64; 2]>>,
}

impl From<&PolygonFeature> for PolygonDescriptor {
    fn from(feature: &PolygonFeature) -> Self {
        PolygonDescriptor {
            label: feature.label().to_string(),
            outer_ring: feature.outer_ring.iter().map(Point::to_lon_lat).collect(),
            holes: feature
                .holes
                .iter()
                .map(|ring| ring.iter().map(Point::to_lon_lat).collect())
                .collect(),
        }
    }
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    /// Map center.
    pub center: Point,

    /// User marker, at the center.
    pub user_marker: UserMarker,

    /// Search radius, at the center.
    pub radius_circle: RadiusCircle,

    /// Matching polygons in filter order.
    pub polygons: Vec<PolygonDescriptor>,
}

/// Assemble the view model for `center`.
pub fn build<'a, I>(center: Point, radius_km: f64, filtered: I) -> ViewModel
where
    I: IntoIterator<Item = &'a PolygonFeature>,
{
    ViewModel {
        center,
        user_marker: UserMarker {
            position: center,
            label: String::from("You are here"),
        },
        radius_circle: RadiusCircle { center, radius_km },
        polygons: filtered.into_iter().map(PolygonDescriptor::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(latitude: f64, longitude: f64) -> Point {
        Point::new(latitude, longitude).unwrap()
    }

    fn feature(name: Option<&str>) -> PolygonFeature {
        PolygonFeature {
            name: name.map(str::to_owned),
            outer_ring: vec![point(1.0, 2.0), point(1.0, 3.0), point(2.0, 3.0)],
            holes: vec![vec![point(1.5, 2.5), point(1.6, 2.5), point(1.6, 2.6)]],
        }
    }

    #[test]
    fn test_build() {
        let center = point(-20.828997, -49.423328);
        let features = vec![feature(Some("Centro")), feature(None)];

        let view = build(center, 20.0, &features);
        assert_eq!(view.center, center);
        assert_eq!(view.user_marker.position, center);
        assert_eq!(view.radius_circle.center, center);
        assert_eq!(view.radius_circle.radius_km, 20.0);

        assert_eq!(view.polygons.len(), 2);
        assert_eq!(view.polygons[0].label, "Centro");
        assert_eq!(view.polygons[1].label, "Unnamed area");
        assert_eq!(view.polygons[0].outer_ring[0], [2.0, 1.0]);
        assert_eq!(view.polygons[0].holes[0][2], [2.6, 1.6]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let center = point(0.0, 0.0);
        let features = vec![feature(Some("a"))];
        assert_eq!(build(center, 5.0, &features), build(center, 5.0, &features));
    }

    #[test]
    fn test_build_without_matches() {
        let view = build(point(0.0, 0.0), 20.0, std::iter::empty());
        assert!(view.polygons.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let view = build(point(1.0, 2.0), 20.0, &vec![feature(Some("a"))]);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["center"]["latitude"], 1.0);
        assert_eq!(json["center"]["longitude"], 2.0);
        assert_eq!(json["radius_circle"]["radius_km"], 20.0);
        assert_eq!(json["polygons"][0]["label"], "a");
        assert_eq!(json["polygons"][0]["outer_ring"][0][0], 2.0);
    }
}
