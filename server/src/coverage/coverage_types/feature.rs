//! Coverage polygons and the collection they are loaded into.

use super::point::Point;
use serde::Serialize;

/// Minimum number of positions for a ring to describe an area.
pub const MIN_RING_VERTICES: usize = 3;

/// A single coverage area.
///
/// Only [`outer_ring`](Self::outer_ring) takes part in proximity tests.
/// Holes are kept so the renderer can draw them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonFeature {
    /// `properties.name` of the source feature, if any.
    pub name: Option<String>,

    /// Outer ring vertices, in source order.
    pub outer_ring: Vec<Point>,

    /// Inner rings, in source order.
    pub holes: Vec<Vec<Point>>,
}

impl PolygonFeature {
    /// Creates a feature without holes.
    pub fn new(name: Option<String>, outer_ring: Vec<Point>) -> Self {
        PolygonFeature {
            name,
            outer_ring,
            holes: vec![],
        }
    }

    /// A feature is testable when its outer ring can enclose an area.
    pub fn has_valid_ring(&self) -> bool {
        self.outer_ring.len() >= MIN_RING_VERTICES
    }

    /// Name shown to the user.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed area")
    }
}

/// Ordered coverage polygons, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    /// Features in source order.
    pub features: Vec<PolygonFeature>,

    /// Number of source features rejected as malformed.
    pub skipped: usize,
}

impl FeatureCollection {
    /// Creates a collection with no skipped features.
    pub fn new(features: Vec<PolygonFeature>) -> Self {
        FeatureCollection {
            features,
            skipped: 0,
        }
    }

    /// Number of usable features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// `true` when there is nothing to filter.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterate over the features in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PolygonFeature> {
        self.features.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0).unwrap(),
            Point::new(0.0, 1.0).unwrap(),
            Point::new(1.0, 1.0).unwrap(),
            Point::new(1.0, 0.0).unwrap(),
        ]
    }

    #[test]
    fn test_has_valid_ring() {
        assert!(PolygonFeature::new(None, square()).has_valid_ring());

        let mut ring = square();
        ring.truncate(2);
        assert!(!PolygonFeature::new(None, ring).has_valid_ring());
        assert!(!PolygonFeature::new(None, vec![]).has_valid_ring());
    }

    #[test]
    fn test_label() {
        let named = PolygonFeature::new(Some("Centro".to_string()), square());
        assert_eq!(named.label(), "Centro");

        let unnamed = PolygonFeature::new(None, square());
        assert_eq!(unnamed.label(), "Unnamed area");
    }

    #[test]
    fn test_empty_collection() {
        let collection = FeatureCollection::default();
        assert!(collection.is_empty());
        assert_eq!(collection.len(), 0);
        assert_eq!(collection.skipped, 0);
    }
}
