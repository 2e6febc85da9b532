//! Spatial referencing of the assembled raster: a regular grid transform, an
//! explicit ground-control-point list sampled from latitude/longitude
//! sub-datasets, or a geolocation-array reference resolved lazily downstream.
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::io::source::{DatasetInfo, RasterSource, SubDatasetRef};

/// WGS84 geographic reference used for GCP and geolocation-array variants.
pub const WGS84_WKT: &str = "GEOGCS[\"WGS 84\",DATUM[\"WGS_1984\",SPHEROID[\"WGS 84\",6378137,298.257223563,AUTHORITY[\"EPSG\",\"7030\"]],AUTHORITY[\"EPSG\",\"6326\"]],PRIMEM[\"Greenwich\",0,AUTHORITY[\"EPSG\",\"8901\"]],UNIT[\"degree\",0.01745329251994328,AUTHORITY[\"EPSG\",\"9122\"]],AUTHORITY[\"EPSG\",\"4326\"]]";

/// One pixel/line to x/y correspondence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gcp {
    pub pixel: f64,
    pub line: f64,
    pub x: f64,
    pub y: f64,
}

/// Exactly one variant is attached to the final raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeoReference {
    Grid {
        transform: [f64; 6],
        projection: String,
    },
    GroundControlPoints {
        gcps: Vec<Gcp>,
        projection: String,
    },
    /// Pointers to per-pixel coordinate sub-datasets plus the step/offset
    /// block a downstream consumer needs to resample on demand.
    GeolocationArrays {
        x_locator: String,
        y_locator: String,
        x_band: usize,
        y_band: usize,
        pixel_offset: usize,
        pixel_step: usize,
        line_offset: usize,
        line_step: usize,
        projection: String,
    },
}

/// How a mapper attaches spatial referencing, selected per product family
/// and injected at construction.
#[derive(Debug, Clone)]
pub enum GeoStrategy {
    /// Product ships on a fixed, documented grid.
    FixedGrid {
        transform: [f64; 6],
        projection: &'static str,
        /// `(cols, rows)`.
        size: (usize, usize),
    },
    /// Regular-grid product: transform and size sampled from the first
    /// resolved sub-dataset, projection forced to the given reference.
    GridFromReference { projection: &'static str },
    /// Swath product: sample the latitude/longitude sub-datasets on an
    /// approximately uniform grid of at most `gcp_count` points.
    GcpsFromLatLon {
        lon_match: &'static str,
        lat_match: &'static str,
        gcp_count: usize,
    },
    /// Swath product, lazy variant: record the coordinate sub-datasets for
    /// on-demand resampling instead of materializing GCPs.
    GeolocationArrays {
        lon_match: &'static str,
        lat_match: &'static str,
    },
}

impl GeoStrategy {
    /// Returns the reference plus the output raster size `(cols, rows)`.
    /// `info` holds the recognized file's sub-datasets (where coordinate
    /// layers live); `reference` is the first resolved band's source.
    pub fn attach<S: RasterSource>(
        &self,
        source: &S,
        info: &DatasetInfo,
        reference: &SubDatasetRef,
    ) -> Result<(GeoReference, (usize, usize))> {
        match self {
            GeoStrategy::FixedGrid {
                transform,
                projection,
                size,
            } => Ok((
                GeoReference::Grid {
                    transform: *transform,
                    projection: projection.to_string(),
                },
                *size,
            )),
            GeoStrategy::GridFromReference { projection } => {
                let transform = source.geo_transform(&reference.locator)?;
                let size = source.raster_size(&reference.locator)?;
                Ok((
                    GeoReference::Grid {
                        transform,
                        projection: projection.to_string(),
                    },
                    size,
                ))
            }
            GeoStrategy::GcpsFromLatLon {
                lon_match,
                lat_match,
                gcp_count,
            } => {
                let lon_sds = find_coordinate(info, lon_match)?;
                let lat_sds = find_coordinate(info, lat_match)?;
                let longitude = source.read_array(&lon_sds.locator)?;
                let latitude = source.read_array(&lat_sds.locator)?;
                if longitude.dim() != latitude.dim() {
                    return Err(Error::CoordinateShapeMismatch {
                        lon: longitude.dim(),
                        lat: latitude.dim(),
                    });
                }
                let gcps = sample_gcps(&latitude, &longitude, *gcp_count);
                debug!("{} GCPs sampled", gcps.len());
                let (rows, cols) = latitude.dim();
                Ok((
                    GeoReference::GroundControlPoints {
                        gcps,
                        projection: WGS84_WKT.to_string(),
                    },
                    (cols, rows),
                ))
            }
            GeoStrategy::GeolocationArrays {
                lon_match,
                lat_match,
            } => {
                let lon_sds = find_coordinate(info, lon_match)?;
                let lat_sds = find_coordinate(info, lat_match)?;
                let size = source.raster_size(&lon_sds.locator)?;
                Ok((
                    GeoReference::GeolocationArrays {
                        x_locator: lon_sds.locator.clone(),
                        y_locator: lat_sds.locator.clone(),
                        x_band: 1,
                        y_band: 1,
                        pixel_offset: 0,
                        pixel_step: 1,
                        line_offset: 0,
                        line_step: 1,
                        projection: WGS84_WKT.to_string(),
                    },
                    size,
                ))
            }
        }
    }
}

fn find_coordinate<'a>(
    info: &'a DatasetInfo,
    description_match: &'static str,
) -> Result<&'a SubDatasetRef> {
    info.subdatasets
        .iter()
        .find(|sds| sds.description.contains(description_match))
        .ok_or(Error::MissingCoordinates(description_match))
}

/// Sample pixel/line to longitude/latitude correspondences on an
/// approximately uniform grid: per-axis step `max(1, dim / sqrt(count))`.
/// Longitude is X, latitude is Y.
pub fn sample_gcps(
    latitude: &ndarray::Array2<f64>,
    longitude: &ndarray::Array2<f64>,
    count: usize,
) -> Vec<Gcp> {
    let (rows, cols) = latitude.dim();
    let grid_side = (count as f64).sqrt();
    let step0 = 1usize.max((rows as f64 / grid_side) as usize);
    let step1 = 1usize.max((cols as f64 / grid_side) as usize);
    let mut gcps = Vec::new();
    for i0 in (0..rows).step_by(step0) {
        for i1 in (0..cols).step_by(step1) {
            gcps.push(Gcp {
                pixel: i1 as f64,
                line: i0 as f64,
                x: longitude[[i0, i1]],
                y: latitude[[i0, i1]],
            });
        }
    }
    gcps
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn gcp_step_for_kilopixel_grid() {
        let latitude = Array2::from_shape_fn((1000, 1000), |(i, _)| i as f64 * 0.01);
        let longitude = Array2::from_shape_fn((1000, 1000), |(_, j)| j as f64 * 0.01);
        let gcps = sample_gcps(&latitude, &longitude, 1000);
        // step = max(1, 1000 / sqrt(1000)) = 31 -> 33 samples per axis.
        assert_eq!(gcps.len(), 33 * 33);
        assert_eq!(gcps[1].pixel, 31.0);
        assert_eq!(gcps[33].line, 31.0);
        // Longitude is X, latitude is Y.
        assert_eq!(gcps[1].x, 0.31);
        assert_eq!(gcps[33].y, 0.31);
    }

    #[test]
    fn gcp_step_never_below_one() {
        let latitude = Array2::zeros((3, 3));
        let longitude = Array2::zeros((3, 3));
        let gcps = sample_gcps(&latitude, &longitude, 1000);
        assert_eq!(gcps.len(), 9);
    }
}
