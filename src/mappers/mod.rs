//! Product mappers. A [`Mapper`] composes a metadata recognizer, a
//! sibling-file pattern, a band-resolution strategy, and a geolocation
//! strategy; the per-product modules only supply the constant tables. Opening
//! a recognized file yields a [`VirtualRaster`], the band-annotated
//! description a consumer can render to a GDAL VRT or a JSON summary.
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::core::descriptor::BandDescriptor;
use crate::core::geolocate::{GeoReference, GeoStrategy};
use crate::core::recognize::Recognizer;
use crate::core::resolve::ResolveStrategy;
use crate::core::siblings::SiblingPattern;
use crate::error::{Error, Result};
use crate::io::source::RasterSource;
use crate::io::vrt;

pub mod amsr2_l3;
pub mod globcolour_l3;
pub mod obpg_l2;

/// The assembled result of one successful mapping.
#[derive(Debug, Clone, Serialize)]
pub struct VirtualRaster {
    /// Name of the mapper that produced this raster.
    pub mapper: &'static str,
    /// Output dimensions `(cols, rows)`.
    pub size: (usize, usize),
    /// Bands in final order.
    pub bands: Vec<BandDescriptor>,
    pub geo: GeoReference,
    pub time: Option<DateTime<Utc>>,
}

impl VirtualRaster {
    /// GDAL VRT document referencing the source sub-datasets.
    pub fn to_vrt_xml(&self) -> Result<String> {
        vrt::write_vrt(self)
    }

    /// JSON summary of the band layout and spatial reference.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One product family's mapping recipe.
pub struct Mapper {
    pub name: &'static str,
    recognizer: Recognizer,
    siblings: SiblingPattern,
    resolver: ResolveStrategy,
    geolocation: GeoStrategy,
    /// Metadata key carrying the acquisition timestamp, when the product
    /// family has one.
    time_key: Option<&'static str>,
}

impl Mapper {
    pub fn new(
        name: &'static str,
        recognizer: Recognizer,
        siblings: SiblingPattern,
        resolver: ResolveStrategy,
        geolocation: GeoStrategy,
    ) -> Self {
        Self {
            name,
            recognizer,
            siblings,
            resolver,
            geolocation,
            time_key: None,
        }
    }

    pub fn with_time_key(mut self, key: &'static str) -> Self {
        self.time_key = Some(key);
        self
    }

    /// Run the full pipeline on one file: recognize, discover siblings,
    /// resolve bands, attach geolocation, assemble.
    pub fn open<S: RasterSource>(&self, source: &S, path: &Path) -> Result<VirtualRaster> {
        let info = source.open(path)?;
        if !self.recognizer.recognize(&info.metadata) {
            return Err(Error::RecognitionMismatch { mapper: self.name });
        }
        info!("{}: recognized {}", self.name, path.display());

        let siblings = self.siblings.discover(path)?;
        let bands = self.resolver.resolve(source, &siblings)?;

        // `resolve` guarantees at least one non-mask band, so the first band
        // is a valid geolocation reference.
        let (geo, size) = self
            .geolocation
            .attach(source, &info, &bands[0].source)?;

        for band in bands.iter().filter(|b| b.is_mask()) {
            let mask_size = source.raster_size(&band.source.locator)?;
            if mask_size != size {
                return Err(Error::MaskDimensionMismatch {
                    mask: mask_size,
                    grid: size,
                });
            }
        }

        let time = self
            .time_key
            .and_then(|key| info.metadata.acquisition_time(key));
        info!("{}: {} bands, {}x{}", self.name, bands.len(), size.0, size.1);
        Ok(VirtualRaster {
            mapper: self.name,
            size,
            bands,
            geo,
            time,
        })
    }
}

/// The built-in mapper registry, in dispatch order.
pub fn default_mappers() -> Vec<Mapper> {
    vec![
        obpg_l2::mapper(),
        globcolour_l3::mapper(),
        amsr2_l3::mapper(),
    ]
}
