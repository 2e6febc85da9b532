//! In-memory [`RasterSource`] holding synthetic datasets. Used by the test
//! suite and handy for exercising mappers without any files on disk (sibling
//! discovery still consults the filesystem, so datasets are keyed by path).
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::Path;

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::io::source::{DatasetInfo, ProductMetadata, RasterSource, SubDatasetRef};

#[derive(Debug, Clone)]
pub struct MemorySubDataset {
    pub name: String,
    pub description: String,
    pub array: Array2<f64>,
    pub metadata: ProductMetadata,
    pub geo_transform: Option<[f64; 6]>,
}

impl MemorySubDataset {
    pub fn new(name: impl Into<String>, description: impl Into<String>, array: Array2<f64>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            array,
            metadata: ProductMetadata::new(),
            geo_transform: None,
        }
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key, value);
        self
    }

    pub fn with_geo_transform(mut self, transform: [f64; 6]) -> Self {
        self.geo_transform = Some(transform);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDataset {
    pub metadata: ProductMetadata,
    pub subdatasets: Vec<MemorySubDataset>,
}

impl MemoryDataset {
    pub fn new(metadata: ProductMetadata) -> Self {
        Self {
            metadata,
            subdatasets: Vec::new(),
        }
    }

    pub fn with_subdataset(mut self, sds: MemorySubDataset) -> Self {
        self.subdatasets.push(sds);
        self
    }
}

#[derive(Debug, Default)]
pub struct MemorySource {
    datasets: RefCell<HashMap<String, MemoryDataset>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_dataset(&self, path: impl Into<String>, dataset: MemoryDataset) {
        self.datasets.borrow_mut().insert(path.into(), dataset);
    }

    fn locator(path: &str, name: &str) -> String {
        format!("MEM:\"{path}\":{name}")
    }

    fn with_subdataset<T>(
        &self,
        locator: &str,
        f: impl FnOnce(&MemorySubDataset) -> T,
    ) -> Result<T> {
        let datasets = self.datasets.borrow();
        for (path, dataset) in datasets.iter() {
            for sds in &dataset.subdatasets {
                if Self::locator(path, &sds.name) == locator {
                    return Ok(f(sds));
                }
            }
        }
        Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no such sub-dataset: {locator}"),
        )))
    }
}

impl RasterSource for MemorySource {
    fn open(&self, path: &Path) -> Result<DatasetInfo> {
        let key = path.to_string_lossy().to_string();
        let datasets = self.datasets.borrow();
        let dataset = datasets.get(&key).ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such dataset: {key}"),
            ))
        })?;
        Ok(DatasetInfo {
            metadata: dataset.metadata.clone(),
            subdatasets: dataset
                .subdatasets
                .iter()
                .map(|sds| SubDatasetRef {
                    locator: Self::locator(&key, &sds.name),
                    band: 1,
                    description: sds.description.clone(),
                })
                .collect(),
        })
    }

    fn band_metadata(&self, locator: &str) -> Result<ProductMetadata> {
        self.with_subdataset(locator, |sds| sds.metadata.clone())
    }

    fn read_array(&self, locator: &str) -> Result<Array2<f64>> {
        self.with_subdataset(locator, |sds| sds.array.clone())
    }

    fn raster_size(&self, locator: &str) -> Result<(usize, usize)> {
        self.with_subdataset(locator, |sds| {
            let (rows, cols) = sds.array.dim();
            (cols, rows)
        })
    }

    fn geo_transform(&self, locator: &str) -> Result<[f64; 6]> {
        self.with_subdataset(locator, |sds| sds.geo_transform)?
            .ok_or_else(|| Error::Processing(format!("no geotransform on {locator}")))
    }

    fn materialize(&self, array: &Array2<f64>, name: &str) -> Result<SubDatasetRef> {
        let mut datasets = self.datasets.borrow_mut();
        let derived = datasets.entry("derived".to_string()).or_default();
        let unique = format!("{name}_{}", derived.subdatasets.len());
        derived.subdatasets.push(MemorySubDataset::new(
            unique.clone(),
            name.to_string(),
            array.clone(),
        ));
        Ok(SubDatasetRef {
            locator: Self::locator("derived", &unique),
            band: 1,
            description: name.to_string(),
        })
    }
}
