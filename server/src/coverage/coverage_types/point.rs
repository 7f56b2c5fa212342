//! Struct definitions and implementations for [`Point`].
//!
//! A [`Point`] is always stored as (latitude, longitude). GeoJSON
//! positions arrive as `[longitude, latitude]` and must go through
//! [`Point::from_lon_lat`], which is the only place the axis order is
//! swapped.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Valid latitude range, in decimal degrees.
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Valid longitude range, in decimal degrees.
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Error types for [`Point`] construction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointError {
    /// Latitude is NaN, infinite or outside of [-90, 90].
    ///
    /// Expected message: "Invalid latitude: {value}"
    InvalidLatitude(f64),

    /// Longitude is NaN, infinite or outside of [-180, 180].
    ///
    /// Expected message: "Invalid longitude: {value}"
    InvalidLongitude(f64),
}

impl Display for PointError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            PointError::InvalidLatitude(value) => write!(f, "Invalid latitude: {}", value),
            PointError::InvalidLongitude(value) => write!(f, "Invalid longitude: {}", value),
        }
    }
}

impl std::error::Error for PointError {}

/// A WGS-84 position in decimal degrees.
///
/// Ordered floats are used so a point can be compared and hashed, which
/// lets it serve as the key of the coverage memo.
#[derive(Debug, PartialEq, Hash, Eq, Copy, Clone, Serialize)]
pub struct Point {
    /// The latitude of the point.
    latitude: OrderedFloat<f64>,

    /// The longitude of the point.
    longitude: OrderedFloat<f64>,
}

impl Point {
    /// Creates a new [`Point`], rejecting out-of-range or non-finite
    /// coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, PointError> {
        if !latitude.is_finite() || latitude < LATITUDE_RANGE.0 || latitude > LATITUDE_RANGE.1 {
            return Err(PointError::InvalidLatitude(latitude));
        }

        if !longitude.is_finite()
            || longitude < LONGITUDE_RANGE.0
            || longitude > LONGITUDE_RANGE.1
        {
            return Err(PointError::InvalidLongitude(longitude));
        }

        Ok(Point {
            latitude: OrderedFloat(latitude),
            longitude: OrderedFloat(longitude),
        })
    }

    /// Converts a GeoJSON `[longitude, latitude]` position.
    pub fn from_lon_lat(position: [f64; 2]) -> Result<Self, PointError> {
        let [longitude, latitude] = position;
        Self::new(latitude, longitude)
    }

    /// Converts back to a GeoJSON `[longitude, latitude]` position.
    pub fn to_lon_lat(&self) -> [f64; 2] {
        [self.longitude(), self.latitude()]
    }

    /// The latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude.into_inner()
    }

    /// The longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude.into_inner()
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "({}, {})", self.latitude(), self.longitude())
    }
}

impl TryFrom<LocationUpdate> for Point {
    type Error = PointError;

    fn try_from(update: LocationUpdate) -> Result<Self, Self::Error> {
        Point::new(update.latitude, update.longitude)
    }
}

impl From<Point> for geo::Point<f64> {
    /// geo uses x = longitude, y = latitude.
    fn from(point: Point) -> Self {
        geo::Point::new(point.longitude(), point.latitude())
    }
}

/// A raw position as delivered by a location sensor.
///
/// Nothing is validated until it is turned into a [`Point`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    /// Reported latitude.
    pub latitude: f64,

    /// Reported longitude.
    pub longitude: f64,
}
