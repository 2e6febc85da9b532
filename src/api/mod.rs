//! High-level entry points: open a product file through the mapper registry
//! without wiring up sources and mappers by hand.
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::io::gdal::GdalSource;
use crate::io::source::RasterSource;
use crate::mappers::{Mapper, VirtualRaster, default_mappers};

/// Try each mapper in order. A recognition mismatch moves on to the next
/// mapper; any other error is definitive for the file and propagates.
pub fn open_product<S: RasterSource>(
    source: &S,
    path: &Path,
    mappers: &[Mapper],
) -> Result<VirtualRaster> {
    for mapper in mappers {
        match mapper.open(source, path) {
            Ok(raster) => return Ok(raster),
            Err(Error::RecognitionMismatch { mapper: name }) => {
                debug!("{name}: not recognized, trying next mapper");
            }
            Err(e) => return Err(e),
        }
    }
    Err(Error::NoMapperMatched {
        path: path.display().to_string(),
    })
}

/// A mapped product together with the GDAL source that backs it. Derived
/// arrays (the quality mask) live in the source's scratch space, so the
/// raster stays referenceable for as long as the source is alive.
pub struct OpenedProduct {
    pub raster: VirtualRaster,
    pub source: GdalSource,
}

impl OpenedProduct {
    /// Open the assembled raster as a GDAL dataset.
    pub fn dataset(&self) -> Result<gdal::Dataset> {
        self.source.open_virtual(&self.raster)
    }
}

/// Open a file with the built-in registry over a GDAL source.
pub fn open(path: impl AsRef<Path>) -> Result<OpenedProduct> {
    let source = GdalSource::new()?;
    let raster = open_product(&source, path.as_ref(), &default_mappers())?;
    Ok(OpenedProduct { raster, source })
}
