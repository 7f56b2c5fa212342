//! # Config
//!
//! Define and implement config options for module

use crate::coverage::coverage_types::point::{Point, PointError};
use crate::coverage::coverage_utils::{
    proximity::{ProximityMode, DEFAULT_RADIUS_KM},
    reconciler::DEFAULT_EPSILON_DEG,
};
use crate::session::SessionSettings;
use anyhow::Result;
use config::{ConfigError, Environment};
use dotenv::dotenv;
use serde::Deserialize;

/// struct holding configuration options
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// latitude of the center used before any location is reported
    pub default_latitude: f64,

    /// longitude of the center used before any location is reported
    pub default_longitude: f64,

    /// proximity cutoff in kilometers
    pub radius_km: f64,

    /// minimum move, in decimal degrees, for a location update to count
    pub epsilon_deg: f64,

    /// proximity test to use, `vertex` or `boundary`
    pub proximity_mode: String,

    /// path to the coverage GeoJSON file, optionally gzip compressed
    pub dataset_path: String,

    /// path to log configuration YAML file
    pub log_config: String,
}

impl Default for Config {
    fn default() -> Self {
        log::warn!("(default) Creating Config object with default values.");
        Self::new()
    }
}

impl Config {
    /// Default values for Config
    pub fn new() -> Self {
        Config {
            default_latitude: -20.828997,
            default_longitude: -49.423328,
            radius_km: DEFAULT_RADIUS_KM,
            epsilon_deg: DEFAULT_EPSILON_DEG,
            proximity_mode: ProximityMode::default().to_string(),
            dataset_path: String::from("data/coverage.geojson"),
            log_config: String::from("log4rs.yaml"),
        }
    }

    /// Create a new `Config` object using environment variables
    pub fn try_from_env() -> Result<Self, ConfigError> {
        // read .env file if present
        dotenv().ok();
        let default_config = Config::default();

        config::Config::builder()
            .set_default("default_latitude", default_config.default_latitude)?
            .set_default("default_longitude", default_config.default_longitude)?
            .set_default("radius_km", default_config.radius_km)?
            .set_default("epsilon_deg", default_config.epsilon_deg)?
            .set_default("proximity_mode", default_config.proximity_mode)?
            .set_default("dataset_path", default_config.dataset_path)?
            .set_default("log_config", default_config.log_config)?
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }

    /// The configured fallback location.
    pub fn default_location(&self) -> Result<Point, PointError> {
        Point::new(self.default_latitude, self.default_longitude)
    }

    /// The configured proximity mode, [`ProximityMode::Vertex`] if the
    /// value is not recognized.
    pub fn proximity_mode(&self) -> ProximityMode {
        self.proximity_mode.parse().unwrap_or_else(|e| {
            log::warn!("(proximity_mode) {}; using vertex proximity.", e);
            ProximityMode::Vertex
        })
    }

    /// Settings for a new session.
    pub fn session_settings(&self) -> Result<SessionSettings, PointError> {
        Ok(SessionSettings {
            default_location: self.default_location()?,
            radius_km: self.radius_km,
            epsilon_deg: self.epsilon_deg,
            proximity_mode: self.proximity_mode(),
        })
    }
}
