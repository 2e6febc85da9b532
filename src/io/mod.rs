//! Raster I/O: the [`RasterSource`] seam, its GDAL and in-memory backends,
//! and the VRT document writer.
pub mod gdal;
pub mod memory;
pub mod source;
pub mod vrt;

pub use gdal::GdalSource;
pub use memory::{MemoryDataset, MemorySource, MemorySubDataset};
pub use source::{DatasetInfo, ProductMetadata, RasterSource, SubDatasetRef};
pub use vrt::write_vrt;
