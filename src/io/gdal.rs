//! GDAL-backed [`RasterSource`]: sub-dataset enumeration from the
//! `SUBDATASETS` metadata domain, whole-band reads into `ndarray`, and
//! scratch-file materialization for derived arrays.
use std::cell::Cell;
use std::collections::BTreeMap;
use std::path::Path;

use gdal::raster::{Buffer, ResampleAlg};
use gdal::{Dataset, DriverManager, Metadata};
use ndarray::Array2;
use tempfile::TempDir;
use tracing::debug;

use crate::error::{Error, Result};
use crate::io::source::{DatasetInfo, ProductMetadata, RasterSource, SubDatasetRef};
use crate::io::vrt;
use crate::mappers::VirtualRaster;

/// GDAL adapter. Holds a scratch directory for materialized derived arrays;
/// the directory lives as long as the source, so virtual datasets referencing
/// a mask stay valid until the source is dropped.
pub struct GdalSource {
    scratch: TempDir,
    counter: Cell<usize>,
}

impl GdalSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            scratch: TempDir::new()?,
            counter: Cell::new(0),
        })
    }

    /// Render the assembled raster to a VRT document and open it through
    /// GDAL's in-memory filesystem.
    pub fn open_virtual(&self, raster: &VirtualRaster) -> Result<Dataset> {
        let xml = vrt::write_vrt(raster)?;
        let n = self.counter.get();
        self.counter.set(n + 1);
        let vsi_path = format!("/vsimem/bandmap_{}_{n}.vrt", raster.mapper);
        gdal::vsi::create_mem_file(&vsi_path, xml.into_bytes())?;
        Ok(Dataset::open(&vsi_path)?)
    }

    fn collect_default_domain<M: Metadata>(item: &M, metadata: &mut ProductMetadata) {
        if let Some(entries) = item.metadata_domain("") {
            for entry in entries {
                if let Some((key, value)) = entry.split_once('=') {
                    metadata.insert(key, value);
                }
            }
        }
    }
}

impl RasterSource for GdalSource {
    fn open(&self, path: &Path) -> Result<DatasetInfo> {
        let dataset = Dataset::open(path)?;
        let mut metadata = ProductMetadata::new();
        Self::collect_default_domain(&dataset, &mut metadata);

        // SUBDATASET_<n>_NAME / SUBDATASET_<n>_DESC pairs, kept in index order.
        let mut names: BTreeMap<usize, String> = BTreeMap::new();
        let mut descriptions: BTreeMap<usize, String> = BTreeMap::new();
        if let Some(entries) = dataset.metadata_domain("SUBDATASETS") {
            for entry in entries {
                let Some((key, value)) = entry.split_once('=') else {
                    continue;
                };
                let Some(rest) = key.strip_prefix("SUBDATASET_") else {
                    continue;
                };
                if let Some(index) = rest.strip_suffix("_NAME") {
                    if let Ok(index) = index.parse::<usize>() {
                        names.insert(index, value.to_string());
                    }
                } else if let Some(index) = rest.strip_suffix("_DESC") {
                    if let Ok(index) = index.parse::<usize>() {
                        descriptions.insert(index, value.to_string());
                    }
                }
            }
        }
        let subdatasets = names
            .into_iter()
            .map(|(index, locator)| SubDatasetRef {
                locator,
                band: 1,
                description: descriptions.remove(&index).unwrap_or_default(),
            })
            .collect();
        Ok(DatasetInfo {
            metadata,
            subdatasets,
        })
    }

    fn band_metadata(&self, locator: &str) -> Result<ProductMetadata> {
        let dataset = Dataset::open(locator)?;
        let mut metadata = ProductMetadata::new();
        Self::collect_default_domain(&dataset, &mut metadata);
        // Band-level entries override dataset-level ones.
        let band = dataset.rasterband(1)?;
        Self::collect_default_domain(&band, &mut metadata);
        Ok(metadata)
    }

    fn read_array(&self, locator: &str) -> Result<Array2<f64>> {
        let dataset = Dataset::open(locator)?;
        let (size_x, size_y) = dataset.raster_size();
        let band = dataset.rasterband(1)?;
        let buf = band.read_as::<f64>(
            (0, 0),
            (size_x, size_y),
            (size_x, size_y),
            Some(ResampleAlg::NearestNeighbour),
        )?;
        let data = buf.data().to_vec();
        Array2::from_shape_vec((size_y, size_x), data)
            .map_err(|e| Error::Processing(e.to_string()))
    }

    fn raster_size(&self, locator: &str) -> Result<(usize, usize)> {
        let dataset = Dataset::open(locator)?;
        let (x, y) = dataset.raster_size();
        Ok((x, y))
    }

    fn geo_transform(&self, locator: &str) -> Result<[f64; 6]> {
        let dataset = Dataset::open(locator)?;
        Ok(dataset.geo_transform()?)
    }

    fn materialize(&self, array: &Array2<f64>, name: &str) -> Result<SubDatasetRef> {
        let (rows, cols) = array.dim();
        let n = self.counter.get();
        self.counter.set(n + 1);
        let path = self.scratch.path().join(format!("{name}_{n}.tif"));
        debug!("materializing {}x{} array at {}", cols, rows, path.display());

        let driver = DriverManager::get_driver_by_name("GTiff")?;
        let mut dataset = driver.create_with_band_type::<f64, _>(&path, cols, rows, 1)?;
        let mut band = dataset.rasterband(1)?;
        let mut buffer = Buffer::new((cols, rows), array.iter().copied().collect());
        band.write((0, 0), (cols, rows), &mut buffer)?;
        dataset.flush_cache()?;

        Ok(SubDatasetRef {
            locator: path.display().to_string(),
            band: 1,
            description: name.to_string(),
        })
    }
}
