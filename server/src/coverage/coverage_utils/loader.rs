//! Loads coverage polygons from a GeoJSON `FeatureCollection`.
//!
//! Failures are split in two scopes:
//! * dataset level (unreadable, empty, not JSON, no `features` list):
//!   reported once as a [`LoadError`] and replaced by an empty collection.
//! * feature level (bad geometry): that feature is skipped and counted,
//!   the rest of the file is still used.

use crate::coverage::coverage_types::{
    feature::{FeatureCollection, PolygonFeature, MIN_RING_VERTICES},
    point::Point,
};
use flate2::read::GzDecoder;
use serde_json::Value;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// First two bytes of any gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Where a dataset comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    /// A file on disk, plain or gzip compressed.
    Path(PathBuf),

    /// Raw bytes already in memory, plain or gzip compressed.
    Bytes(Vec<u8>),
}

impl DatasetSource {
    /// Convenience constructor for a file source.
    pub fn path(path: impl AsRef<Path>) -> Self {
        DatasetSource::Path(path.as_ref().to_path_buf())
    }
}

impl Display for DatasetSource {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            DatasetSource::Path(path) => write!(f, "{}", path.display()),
            DatasetSource::Bytes(bytes) => write!(f, "<{} bytes in memory>", bytes.len()),
        }
    }
}

/// Dataset level load failures.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The source could not be read or decompressed.
    Unreadable(String),

    /// The source contains no data.
    Empty,

    /// The source is not valid JSON.
    InvalidJson(String),

    /// The document has no `features` list.
    MissingFeatures,
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            LoadError::Unreadable(e) => write!(f, "Could not read dataset: {}", e),
            LoadError::Empty => write!(f, "Dataset is empty"),
            LoadError::InvalidJson(e) => write!(f, "Dataset is not valid JSON: {}", e),
            LoadError::MissingFeatures => write!(f, "Dataset has no features list"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Result of a load: always a usable collection, plus the reason it is
/// empty when the dataset itself could not be used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// The loaded features. Empty when `notice` is set.
    pub collection: FeatureCollection,

    /// Dataset level failure, if any.
    pub notice: Option<LoadError>,
}

/// Load a dataset, degrading to an empty collection on failure.
pub fn load(source: &DatasetSource) -> Dataset {
    loader_info!("(load) Loading coverage dataset from [{}].", source);

    let result = read_source(source).and_then(|bytes| parse_feature_collection(&bytes));
    match result {
        Ok(collection) => {
            loader_info!(
                "(load) Loaded {} features, skipped {} malformed.",
                collection.len(),
                collection.skipped
            );
            Dataset {
                collection,
                notice: None,
            }
        }
        Err(e) => {
            loader_error!("(load) {}; continuing with zero features.", e);
            Dataset {
                collection: FeatureCollection::default(),
                notice: Some(e),
            }
        }
    }
}

/// Read the raw source and inflate it when it is gzip compressed.
pub fn read_source(source: &DatasetSource) -> Result<Vec<u8>, LoadError> {
    let raw = match source {
        DatasetSource::Path(path) => {
            std::fs::read(path).map_err(|e| LoadError::Unreadable(e.to_string()))?
        }
        DatasetSource::Bytes(bytes) => bytes.clone(),
    };

    if !raw.starts_with(&GZIP_MAGIC) {
        return Ok(raw);
    }

    loader_debug!("(read_source) Decompressing gzip input.");
    let mut inflated = Vec::new();
    GzDecoder::new(raw.as_slice())
        .read_to_end(&mut inflated)
        .map_err(|e| LoadError::Unreadable(e.to_string()))?;

    Ok(inflated)
}

/// Parse a GeoJSON `FeatureCollection` document.
pub fn parse_feature_collection(bytes: &[u8]) -> Result<FeatureCollection, LoadError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(LoadError::Empty);
    }

    let document: Value =
        serde_json::from_slice(bytes).map_err(|e| LoadError::InvalidJson(e.to_string()))?;

    let Some(raw_features) = document.get("features").and_then(Value::as_array) else {
        return Err(LoadError::MissingFeatures);
    };

    let mut collection = FeatureCollection::default();
    for (index, raw) in raw_features.iter().enumerate() {
        match parse_feature(raw) {
            Ok(feature) => collection.features.push(feature),
            Err(reason) => {
                loader_warn!(
                    "(parse_feature_collection) Skipping feature [{}]: {}.",
                    index,
                    reason
                );
                collection.skipped += 1;
            }
        }
    }

    Ok(collection)
}

/// Parse one feature. `geometry.coordinates[0]` is the outer ring, the
/// remaining rings are holes.
fn parse_feature(raw: &Value) -> Result<PolygonFeature, String> {
    let name = raw
        .pointer("/properties/name")
        .and_then(Value::as_str)
        .map(str::to_owned);

    let rings = raw
        .pointer("/geometry/coordinates")
        .and_then(Value::as_array)
        .ok_or("missing geometry.coordinates")?;

    let (outer, holes) = rings.split_first().ok_or("no rings")?;
    let outer_ring = parse_ring(outer)?;
    if outer_ring.len() < MIN_RING_VERTICES {
        return Err(format!(
            "outer ring has {} vertices, need at least {}",
            outer_ring.len(),
            MIN_RING_VERTICES
        ));
    }

    let holes = holes
        .iter()
        .map(parse_ring)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PolygonFeature {
        name,
        outer_ring,
        holes,
    })
}

fn parse_ring(raw: &Value) -> Result<Vec<Point>, String> {
    raw.as_array()
        .ok_or("ring is not a list")?
        .iter()
        .map(parse_position)
        .collect()
}

/// A position is `[longitude, latitude]`, optionally followed by an
/// altitude which is ignored.
fn parse_position(raw: &Value) -> Result<Point, String> {
    let values = raw.as_array().ok_or("position is not a list")?;
    let (Some(lon), Some(lat)) = (
        values.first().and_then(Value::as_f64),
        values.get(1).and_then(Value::as_f64),
    ) else {
        return Err(format!("position {} is not a numeric pair", raw));
    };

    Point::from_lon_lat([lon, lat]).map_err(|e| e.to_string())
}

/// Loads a dataset at most once and hands out shared read-only copies.
#[derive(Debug)]
pub struct DatasetCache {
    cell: OnceCell<Arc<Dataset>>,
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCache {
    /// Creates an empty cache.
    pub const fn new() -> Self {
        DatasetCache {
            cell: OnceCell::const_new(),
        }
    }

    /// Returns the cached dataset, loading it from `source` on first use.
    /// Later calls ignore `source`.
    pub async fn get_or_load(&self, source: &DatasetSource) -> Arc<Dataset> {
        self.cell
            .get_or_init(|| async move { Arc::new(load(source)) })
            .await
            .clone()
    }

    /// Returns the dataset if it has been loaded.
    pub fn get(&self) -> Option<Arc<Dataset>> {
        self.cell.get().cloned()
    }
}

/// Process wide dataset, shared by every session.
pub static DATASET: DatasetCache = DatasetCache::new();
