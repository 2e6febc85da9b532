//! The narrow seam between the mappers and whatever library actually decodes
//! raster files. Everything the Band Resolver needs from a file goes through
//! [`RasterSource`]: open a container, enumerate its sub-datasets, read a
//! sub-dataset's metadata or pixel array, and materialize a derived array so
//! a virtual dataset can reference it.
use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One named raster layer inside a multi-layer source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubDatasetRef {
    /// Opaque locator understood by the `RasterSource` that produced it.
    pub locator: String,
    /// 1-based band index inside the sub-dataset (always 1 for the
    /// NetCDF/HDF products handled here).
    pub band: usize,
    /// Free-form description string used for pattern matching.
    pub description: String,
}

/// File- or band-level key/value attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductMetadata(HashMap<String, String>);

impl ProductMetadata {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric lookup; `None` when the key is absent or unparsable.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.trim().parse::<f64>().ok())
    }

    /// Parse an acquisition timestamp from a metadata field. Tries RFC 3339
    /// first, then the date/time grammars the supported missions actually
    /// emit. `None` when the key is absent or no grammar matches.
    pub fn acquisition_time(&self, key: &str) -> Option<DateTime<Utc>> {
        let value = self.get(key)?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y%m%dT%H%M%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
                return Some(dt.and_utc());
            }
        }
        if let Ok(d) = NaiveDate::parse_from_str(value, "%Y%m%d") {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
        None
    }
}

impl FromIterator<(String, String)> for ProductMetadata {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What opening a container file yields: its top-level attributes and the
/// sub-datasets it exposes, in enumeration order.
#[derive(Debug, Clone)]
pub struct DatasetInfo {
    pub metadata: ProductMetadata,
    pub subdatasets: Vec<SubDatasetRef>,
}

/// Capability interface over an external raster-I/O library. The mappers hold
/// a `RasterSource` only for the duration of one resolution; no handles are
/// retained afterwards.
pub trait RasterSource {
    /// Open a container file and enumerate it. Fails for missing or
    /// undecodable files; callers iterating sibling files treat that as a
    /// skip, not a fatal condition.
    fn open(&self, path: &Path) -> Result<DatasetInfo>;

    /// Key/value metadata of a sub-dataset (band-level entries override
    /// dataset-level ones when both exist).
    fn band_metadata(&self, locator: &str) -> Result<ProductMetadata>;

    /// Read the full pixel array of a sub-dataset, shape `(rows, cols)`.
    fn read_array(&self, locator: &str) -> Result<Array2<f64>>;

    /// Pixel dimensions of a sub-dataset as `(cols, rows)`.
    fn raster_size(&self, locator: &str) -> Result<(usize, usize)>;

    /// Affine geotransform of a sub-dataset.
    fn geo_transform(&self, locator: &str) -> Result<[f64; 6]>;

    /// Persist a derived array (e.g. a computed quality mask) so the
    /// assembled virtual dataset can reference it like any other sub-dataset.
    fn materialize(&self, array: &Array2<f64>, name: &str) -> Result<SubDatasetRef>;
}
