#![doc = r#"
BANDMAP — satellite product mappers for ocean-color and radiometer files.

This crate recognizes a handful of satellite product families from their
metadata fingerprints and exposes each file (plus its sibling files) as a
band-annotated virtual raster: every geophysical band carries a well-known
variable name, calibration, and georeferencing, regardless of the vendor's
container layout. The result can be rendered to a GDAL VRT document, opened
as a GDAL dataset, or exported as a JSON band summary.

Supported product families
--------------------------
- OBPG ocean-color Level-2 swaths (HMODISA): Rrs reflectances, chlorophyll,
  attenuation, CDOM, quality flags; swath georeferencing from the embedded
  latitude/longitude arrays.
- GlobColour merged Level-3 mapped products: one NetCDF file per variable,
  discovered by shared file-name prefix; derived water-reflectance ratios and
  a condensed quality mask.
- AMSR2 Level-3 gridded brightness temperatures (GCOM-W1): one HDF file per
  channel frequency on the fixed NSIDC 10 km polar grid.

Requirements
------------
- GDAL development headers and runtime available on your system.
- Rust 2024 edition toolchain.

Quick start: open a product
---------------------------
```rust,no_run
fn main() -> bandmap::Result<()> {
    let opened = bandmap::open("/data/A2012166.L2_LAC.NorthNorwegianSeas.hdf")?;
    for band in &opened.raster.bands {
        println!(
            "{}: {}",
            band.meta.name.as_deref().unwrap_or("?"),
            band.meta.wkv.map(|w| w.as_str()).unwrap_or("service band"),
        );
    }
    println!("{}", opened.raster.to_vrt_xml()?);
    Ok(())
}
```

Custom mapper registry over an explicit source
----------------------------------------------
```rust,no_run
use std::path::Path;
use bandmap::io::GdalSource;
use bandmap::mappers;

fn main() -> bandmap::Result<()> {
    let source = GdalSource::new()?;
    let registry = vec![mappers::obpg_l2::mapper_with_geolocation_arrays()];
    let raster = bandmap::api::open_product(
        &source,
        Path::new("/data/A2012166.L2_LAC.NorthNorwegianSeas.hdf"),
        &registry,
    )?;
    println!("{}", raster.to_json()?);
    Ok(())
}
```

Error handling
--------------
All public functions return `bandmap::Result<T>`; match on `bandmap::Error`
to handle specific cases, e.g. no mapper recognizing a file.

Feature flags
-------------
- `gui` (default): builds the interactive point/line picker and its binary.

Useful modules
--------------
- [`api`] — high-level entry points over the mapper registry.
- [`mappers`] — the per-product mapping recipes and [`mappers::VirtualRaster`].
- [`core`] — recognition, sibling discovery, band resolution, geolocation.
- [`io`] — the `RasterSource` seam, GDAL/in-memory backends, VRT writing.
- [`picker`] — the point/line picker state machine (GUI under `gui`).
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod mappers;
pub mod picker;
pub mod types;

pub use error::{Error, Result};
pub use types::{Polarisation, WaterCase, Wkv};

pub use core::{
    BandDescriptor, BandMeta, GeoReference, GeoStrategy, Recognizer, ResolveStrategy,
    SiblingPattern,
};
pub use io::{GdalSource, MemorySource, RasterSource};
pub use mappers::{Mapper, VirtualRaster, default_mappers};
pub use picker::{ClickKind, PointBrowser, Polyline};

pub use api::{OpenedProduct, open, open_product};
