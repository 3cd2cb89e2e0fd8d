//! GeoJSON-shaped feature types written to map sources.

use serde::{Deserialize, Serialize};

/// A longitude/latitude coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Whether both components are finite numbers.
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }
}

/// A geographic bounding box given by its north-west and south-east corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLatBounds {
    pub north_west: LngLat,
    pub south_east: LngLat,
}

impl LngLatBounds {
    pub fn new(north_west: LngLat, south_east: LngLat) -> Self {
        Self {
            north_west,
            south_east,
        }
    }

    /// Center point of the box.
    pub fn center(&self) -> LngLat {
        LngLat::new(
            (self.north_west.lng + self.south_east.lng) / 2.0,
            (self.north_west.lat + self.south_east.lat) / 2.0,
        )
    }

    /// Whether the box is finite and has spread on both axes.
    ///
    /// A single point (zero spread) is not a usable fit target; callers fall
    /// back to a point fly-to instead.
    pub fn is_valid(&self) -> bool {
        self.north_west.is_valid()
            && self.south_east.is_valid()
            && self.south_east.lng > self.north_west.lng
            && self.north_west.lat > self.south_east.lat
    }

    /// Smallest bounds containing all `points`.
    ///
    /// Returns `None` when `points` is empty or contains a non-finite
    /// coordinate.
    pub fn around(points: &[LngLat]) -> Option<Self> {
        if points.is_empty() || points.iter().any(|p| !p.is_valid()) {
            return None;
        }

        let mut min_lng = f64::INFINITY;
        let mut max_lng = f64::NEG_INFINITY;
        let mut min_lat = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;

        for p in points {
            min_lng = min_lng.min(p.lng);
            max_lng = max_lng.max(p.lng);
            min_lat = min_lat.min(p.lat);
            max_lat = max_lat.max(p.lat);
        }

        Some(Self::new(
            LngLat::new(min_lng, max_lat),
            LngLat::new(max_lng, min_lat),
        ))
    }
}

/// Feature geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// A single point as `[lng, lat]`
    Point([f64; 2]),
    /// An ordered line of `[lng, lat]` positions
    LineString(Vec<[f64; 2]>),
}

impl Geometry {
    pub fn point(coords: LngLat) -> Self {
        Geometry::Point([coords.lng, coords.lat])
    }

    pub fn line(points: &[LngLat]) -> Self {
        Geometry::LineString(points.iter().map(|p| [p.lng, p.lat]).collect())
    }
}

/// A single feature with free-form styling properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Stable feature identifier, if the entity has one
    pub id: Option<String>,
    pub geometry: Geometry,
    /// Properties consumed by the surface's style layer
    pub properties: serde_json::Value,
}

impl Feature {
    pub fn point(id: impl Into<String>, coords: LngLat, properties: serde_json::Value) -> Self {
        Self {
            id: Some(id.into()),
            geometry: Geometry::point(coords),
            properties,
        }
    }
}

/// A whole-collection replacement payload for one map source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// The empty collection, used to clear a source.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_around_points() {
        let points = vec![
            LngLat::new(7.0, 46.0),
            LngLat::new(8.0, 45.0),
            LngLat::new(7.5, 45.5),
        ];
        let bounds = LngLatBounds::around(&points).expect("Should produce bounds");
        assert_eq!(bounds.north_west, LngLat::new(7.0, 46.0));
        assert_eq!(bounds.south_east, LngLat::new(8.0, 45.0));
        assert!(bounds.is_valid());
    }

    #[test]
    fn test_bounds_around_single_point_is_degenerate() {
        let bounds = LngLatBounds::around(&[LngLat::new(7.0, 46.0)]).expect("Should produce bounds");
        assert!(!bounds.is_valid());
    }

    #[test]
    fn test_bounds_around_rejects_nan() {
        assert!(LngLatBounds::around(&[LngLat::new(f64::NAN, 46.0)]).is_none());
        assert!(LngLatBounds::around(&[]).is_none());
    }

    #[test]
    fn test_center() {
        let bounds = LngLatBounds::new(LngLat::new(6.0, 47.0), LngLat::new(8.0, 45.0));
        assert_eq!(bounds.center(), LngLat::new(7.0, 46.0));
    }
}
