//! Band descriptors: the unit of work the Band Resolver produces and the
//! virtual-dataset builder consumes.
use serde::{Deserialize, Serialize};

use crate::io::source::SubDatasetRef;
use crate::types::{Polarisation, WaterCase, Wkv};

/// Destination metadata of one resolved band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandMeta {
    /// Standardized variable identifier. `None` only for service bands such
    /// as the quality mask.
    pub wkv: Option<Wkv>,
    /// Short band name, e.g. `Rrs_412`, `nLw_443`, `mask`.
    pub name: Option<String>,
    /// Suffix distinguishing repeated variables (wavelength or
    /// frequency+polarisation code).
    pub suffix: Option<String>,
    pub wavelength: Option<String>,
    pub frequency: Option<String>,
    pub polarisation: Option<Polarisation>,
    pub case: Option<WaterCase>,
    /// Symbolic expression for derived bands, recorded for consumers.
    pub expression: Option<String>,
    /// GDAL data-type code hint (e.g. 5 for Int32 flag bands).
    pub data_type: Option<u32>,
}

/// Source-to-destination mapping record for one band of the output raster.
/// Emission order is significant: it is the band order of the final raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandDescriptor {
    pub source: SubDatasetRef,
    pub scale: Option<f64>,
    pub offset: Option<f64>,
    pub meta: BandMeta,
}

impl BandDescriptor {
    pub fn new(source: SubDatasetRef, meta: BandMeta) -> Self {
        Self {
            source,
            scale: None,
            offset: None,
            meta,
        }
    }

    pub fn is_mask(&self) -> bool {
        self.meta.wkv.is_none() && self.meta.name.as_deref() == Some("mask")
    }
}

/// Static table entry mapping a product-internal short name to a well-known
/// variable plus its auxiliary parameters. Tables are defined once per mapper
/// and injected at construction; entries are evaluated in declaration order
/// and the first sub-string match wins.
#[derive(Debug, Clone, Copy)]
pub struct VariableMapping {
    /// Product-internal short code matched against sub-dataset descriptions.
    pub short_name: &'static str,
    pub wkv: Wkv,
    /// Destination band name; falls back to `short_name` when absent.
    pub band_name: Option<&'static str>,
    pub wavelength: Option<&'static str>,
    pub case: Option<WaterCase>,
    pub data_type: Option<u32>,
}

impl VariableMapping {
    pub const fn new(short_name: &'static str, wkv: Wkv) -> Self {
        Self {
            short_name,
            wkv,
            band_name: None,
            wavelength: None,
            case: None,
            data_type: None,
        }
    }

    pub const fn band_name(mut self, name: &'static str) -> Self {
        self.band_name = Some(name);
        self
    }

    pub const fn wavelength(mut self, wavelength: &'static str) -> Self {
        self.wavelength = Some(wavelength);
        self
    }

    pub const fn case(mut self, case: WaterCase) -> Self {
        self.case = Some(case);
        self
    }

    pub const fn data_type(mut self, code: u32) -> Self {
        self.data_type = Some(code);
        self
    }
}
