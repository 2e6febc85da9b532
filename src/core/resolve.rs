//! The Band Resolver: walks the sibling files of a recognized product and
//! turns every recognizable sub-dataset into a [`BandDescriptor`]. Resolution
//! is best-effort: unrecognized sub-datasets are dropped, unopenable siblings
//! are skipped; only an empty result is an error. Emission order is the band
//! order of the output raster and is preserved exactly.
use ndarray::Array2;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::core::descriptor::{BandDescriptor, BandMeta, VariableMapping};
use crate::core::siblings::Sibling;
use crate::error::{Error, Result};
use crate::io::source::{RasterSource, SubDatasetRef};
use crate::types::{Polarisation, Wkv};

/// Reflectance-band naming convention: fixed prefix followed by a 3-digit
/// wavelength code. A fourth digit disqualifies the match.
#[derive(Debug, Clone)]
pub struct ReflectanceRule {
    pattern: Regex,
    pub wkv: Wkv,
}

impl ReflectanceRule {
    /// Remote-sensing-reflectance convention used by the ocean-color L2
    /// products (`Rrs_412`, `Rrs_443`, ...).
    pub fn rrs() -> Self {
        // No lookahead in the regex crate; a trailing non-digit-or-end group
        // enforces the 3-digit boundary.
        Self {
            pattern: Regex::new(r"(Rrs_(\d{3}))([^0-9]|$)").unwrap(),
            wkv: Wkv::ReflectanceRatioAir,
        }
    }

    /// Returns `(band_name, wavelength)` when the description follows the
    /// convention.
    pub fn extract(&self, description: &str) -> Option<(String, String)> {
        self.pattern
            .captures(description)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
    }
}

/// Derived-band rule: upwelling-radiance bands get a second, normalized
/// counterpart computed as `value / solar_irradiance`.
#[derive(Debug, Clone, Copy)]
pub struct DerivedRatioRule {
    pub trigger: Wkv,
    pub ratio_wkv: Wkv,
    pub irradiance_key: &'static str,
}

/// Quality-mask rule: one sibling carries a bit-flag sub-dataset recognized
/// by a description substring.
#[derive(Debug, Clone, Copy)]
pub struct MaskRule {
    pub description_match: &'static str,
}

/// Rules for products whose sub-datasets are recognized by description.
#[derive(Debug, Clone)]
pub struct SubDatasetRules {
    pub reflectance: Option<ReflectanceRule>,
    /// Ordered lookup table; first sub-string match wins.
    pub mappings: Vec<VariableMapping>,
    pub derived_ratio: Option<DerivedRatioRule>,
    pub mask: Option<MaskRule>,
    /// Band-metadata keys holding the linear calibration.
    pub scale_key: &'static str,
    pub offset_key: &'static str,
}

/// Rules for frequency-keyed passive-microwave products.
#[derive(Debug, Clone)]
pub struct FrequencyRules {
    /// Locator substring selecting the brightness-temperature sub-datasets.
    pub locator_match: &'static str,
    pub wkv: Wkv,
    /// Vendor-documented multiplicative calibration, not read from metadata.
    pub scale: f64,
}

#[derive(Debug, Clone)]
pub enum ResolveStrategy {
    SubDatasets(SubDatasetRules),
    FrequencyBands(FrequencyRules),
}

impl ResolveStrategy {
    pub fn resolve<S: RasterSource>(
        &self,
        source: &S,
        siblings: &[Sibling],
    ) -> Result<Vec<BandDescriptor>> {
        let bands = match self {
            ResolveStrategy::SubDatasets(rules) => rules.resolve(source, siblings)?,
            ResolveStrategy::FrequencyBands(rules) => rules.resolve(source, siblings)?,
        };
        if bands.iter().all(BandDescriptor::is_mask) {
            return Err(Error::NoRecognizedBands);
        }
        Ok(bands)
    }
}

impl SubDatasetRules {
    fn resolve<S: RasterSource>(
        &self,
        source: &S,
        siblings: &[Sibling],
    ) -> Result<Vec<BandDescriptor>> {
        let mut bands = Vec::new();
        let mut mask_source: Option<SubDatasetRef> = None;

        for sibling in siblings {
            let info = match source.open(&sibling.path) {
                Ok(info) => info,
                Err(e) => {
                    warn!("skipping sibling {}: {}", sibling.path.display(), e);
                    continue;
                }
            };
            for sds in &info.subdatasets {
                if let Some(mask) = &self.mask {
                    if mask_source.is_none() && sds.description.contains(mask.description_match) {
                        mask_source = Some(sds.clone());
                    }
                }
                if let Some(descriptor) = self.resolve_subdataset(source, sds) {
                    let derived = self.derive_ratio(source, &descriptor);
                    debug!("band resolved: {:?}", descriptor.meta.name);
                    bands.push(descriptor);
                    // Derived band follows its parent immediately.
                    if let Some(second) = derived {
                        bands.push(second);
                    }
                } else {
                    debug!("unrecognized sub-dataset: {}", sds.description);
                }
            }
        }

        if let Some(_mask) = &self.mask {
            match mask_source {
                Some(sds) => bands.push(self.derive_mask(source, &sds)?),
                None => warn!("flag sub-dataset not found; mask band skipped"),
            }
        }
        Ok(bands)
    }

    fn resolve_subdataset<S: RasterSource>(
        &self,
        source: &S,
        sds: &SubDatasetRef,
    ) -> Option<BandDescriptor> {
        if let Some(rule) = &self.reflectance {
            if let Some((name, wavelength)) = rule.extract(&sds.description) {
                let mut descriptor = BandDescriptor::new(
                    sds.clone(),
                    BandMeta {
                        wkv: Some(rule.wkv),
                        name: Some(name),
                        wavelength: Some(wavelength),
                        ..Default::default()
                    },
                );
                self.import_calibration(source, &mut descriptor);
                return Some(descriptor);
            }
        }

        let mapping = self
            .mappings
            .iter()
            .find(|m| sds.description.contains(m.short_name))?;
        let suffix = self
            .derived_ratio
            .filter(|rule| rule.trigger == mapping.wkv)
            .and(mapping.wavelength)
            .map(str::to_string);
        let mut descriptor = BandDescriptor::new(
            sds.clone(),
            BandMeta {
                wkv: Some(mapping.wkv),
                name: Some(mapping.band_name.unwrap_or(mapping.short_name).to_string()),
                suffix,
                wavelength: mapping.wavelength.map(str::to_string),
                case: mapping.case,
                data_type: mapping.data_type,
                ..Default::default()
            },
        );
        self.import_calibration(source, &mut descriptor);
        Some(descriptor)
    }

    /// Scale/offset from the sub-dataset's own metadata; absent keys degrade
    /// to no adjustment.
    fn import_calibration<S: RasterSource>(&self, source: &S, descriptor: &mut BandDescriptor) {
        let metadata = match source.band_metadata(&descriptor.source.locator) {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("no band metadata for {}: {}", descriptor.source.locator, e);
                return;
            }
        };
        descriptor.scale = metadata.get_f64(self.scale_key);
        descriptor.offset = metadata.get_f64(self.offset_key);
    }

    fn derive_ratio<S: RasterSource>(
        &self,
        source: &S,
        parent: &BandDescriptor,
    ) -> Option<BandDescriptor> {
        let rule = self.derived_ratio?;
        if parent.meta.wkv != Some(rule.trigger) {
            return None;
        }
        let irradiance = source
            .band_metadata(&parent.source.locator)
            .ok()
            .and_then(|metadata| metadata.get_f64(rule.irradiance_key));
        let Some(irradiance) = irradiance else {
            warn!(
                "{} missing on {}; normalized ratio band skipped",
                rule.irradiance_key, parent.source.locator
            );
            return None;
        };
        let parent_name = parent
            .meta
            .name
            .clone()
            .unwrap_or_else(|| parent.source.description.clone());
        debug!("derived ratio band appended after {}", parent_name);
        Some(BandDescriptor {
            source: parent.source.clone(),
            // The linear expression realized as a plain calibration.
            scale: Some(1.0 / irradiance),
            offset: Some(0.0),
            meta: BandMeta {
                wkv: Some(rule.ratio_wkv),
                name: parent.meta.wavelength.as_deref().map(|wl| format!("Rrsw_{wl}")),
                suffix: parent.meta.suffix.clone(),
                wavelength: parent.meta.wavelength.clone(),
                expression: Some(format!("{parent_name} / {irradiance}")),
                ..Default::default()
            },
        })
    }

    fn derive_mask<S: RasterSource>(
        &self,
        source: &S,
        flags: &SubDatasetRef,
    ) -> Result<BandDescriptor> {
        let raw = source.read_array(&flags.locator)?;
        let mask = derive_flag_mask(&raw);
        let materialized = source.materialize(&mask, "mask")?;
        info!("quality mask derived from {}", flags.description);
        Ok(BandDescriptor::new(
            materialized,
            BandMeta {
                name: Some("mask".to_string()),
                ..Default::default()
            },
        ))
    }
}

/// Fixed bit-test policy for the quality-flag array: pixels default to 64,
/// bit 0 marks 1, bit 3 marks 2. Checks run in bit order 0 then 3, so bit 3
/// wins when both are set.
pub fn derive_flag_mask(flags: &Array2<f64>) -> Array2<f64> {
    flags.mapv(|value| {
        let bits = value as u64;
        let mut mask = 64.0;
        if bits & (1 << 0) != 0 {
            mask = 1.0;
        }
        if bits & (1 << 3) != 0 {
            mask = 2.0;
        }
        mask
    })
}

impl FrequencyRules {
    fn resolve<S: RasterSource>(
        &self,
        source: &S,
        siblings: &[Sibling],
    ) -> Result<Vec<BandDescriptor>> {
        let mut bands = Vec::new();
        for sibling in siblings {
            let Some(freq) = sibling.frequency else {
                continue;
            };
            let info = match source.open(&sibling.path) {
                Ok(info) => info,
                Err(e) => {
                    warn!("skipping sibling {}: {}", sibling.path.display(), e);
                    continue;
                }
            };
            for sds in &info.subdatasets {
                if !sds.locator.contains(self.locator_match) {
                    continue;
                }
                let polarisation = polarisation_from_locator(&sds.locator);
                if polarisation.is_none() {
                    warn!("no polarisation code in locator: {}", sds.locator);
                }
                let suffix = format!(
                    "{:02}{}",
                    freq,
                    polarisation.map(|p| p.as_str()).unwrap_or("")
                );
                bands.push(BandDescriptor {
                    source: sds.clone(),
                    scale: Some(self.scale),
                    offset: Some(0.0),
                    meta: BandMeta {
                        wkv: Some(self.wkv),
                        name: Some(format!("tb{suffix}")),
                        suffix: Some(suffix),
                        frequency: Some(format!("{freq:02}")),
                        polarisation,
                        ..Default::default()
                    },
                });
            }
        }
        Ok(bands)
    }
}

/// Single-letter polarisation code at the fixed offset (second-to-last
/// character) of a brightness-temperature sub-dataset locator.
pub fn polarisation_from_locator(locator: &str) -> Option<Polarisation> {
    locator
        .chars()
        .rev()
        .nth(1)
        .and_then(Polarisation::from_char)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn reflectance_extraction_three_digit_boundary() {
        let rule = ReflectanceRule::rrs();
        assert_eq!(
            rule.extract("Rrs_412 remote sensing reflectance"),
            Some(("Rrs_412".to_string(), "412".to_string()))
        );
        // Description ending right after the code still matches.
        assert_eq!(
            rule.extract("//HDF:file.nc://Rrs_555"),
            Some(("Rrs_555".to_string(), "555".to_string()))
        );
        // 4-digit codes must not match the fixed 3-digit pattern.
        assert_eq!(rule.extract("Rrs_1234"), None);
        assert_eq!(rule.extract("Kd_490"), None);
    }

    #[test]
    fn flag_mask_bit_policy() {
        let flags = array![[1.0, 8.0], [4.0, 0.0]];
        let mask = derive_flag_mask(&flags);
        assert_eq!(mask, array![[1.0, 2.0], [64.0, 64.0]]);
        // Bit 3 overrides bit 0 when both are set.
        let both = array![[9.0]];
        assert_eq!(derive_flag_mask(&both), array![[2.0]]);
    }

    #[test]
    fn polarisation_offset_parse() {
        assert_eq!(
            polarisation_from_locator("HDF5:\"f.h5\"://Brightness_Temperature_(H)"),
            Some(Polarisation::H)
        );
        assert_eq!(
            polarisation_from_locator("HDF5:\"f.h5\"://Brightness_Temperature_(V)"),
            Some(Polarisation::V)
        );
        assert_eq!(polarisation_from_locator("no_code_here"), None);
    }
}
