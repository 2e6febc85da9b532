//! Shared types used across bandmap.
//! Includes the well-known-variable identifiers (`Wkv`), antenna/radiance
//! `Polarisation`, and the ocean-color processing `WaterCase`.
use serde::{Deserialize, Serialize};

/// Well-known geophysical variable identifiers, independent of any vendor
/// short code. The string forms follow CF standard-name conventions and are
/// what ends up in band metadata of the assembled virtual raster.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum Wkv {
    ChlorophyllA,
    DownwellingAttenuation,
    CdomAbsorption,
    SuspendedMatter,
    AerosolOpticalThickness,
    UpwellingRadiance,
    /// Upwelling radiance normalized by downwelling flux in air (remote
    /// sensing reflectance).
    ReflectanceRatioAir,
    /// Upwelling radiance normalized by downwelling flux in water.
    ReflectanceRatioWater,
    BrightnessTemperature,
    QualityFlags,
}

impl Wkv {
    pub fn as_str(&self) -> &'static str {
        match self {
            Wkv::ChlorophyllA => "mass_concentration_of_chlorophyll_a_in_sea_water",
            Wkv::DownwellingAttenuation => {
                "volume_attenuation_coefficient_of_downwelling_radiative_flux_in_sea_water"
            }
            Wkv::CdomAbsorption => {
                "volume_absorption_coefficient_of_radiative_flux_in_sea_water_due_to_dissolved_organic_matter"
            }
            Wkv::SuspendedMatter => "mass_concentration_of_suspended_matter_in_sea_water",
            Wkv::AerosolOpticalThickness => "atmosphere_optical_thickness_due_to_aerosol",
            Wkv::UpwellingRadiance => {
                "surface_upwelling_spectral_radiance_in_air_emerging_from_sea_water"
            }
            Wkv::ReflectanceRatioAir => {
                "surface_ratio_of_upwelling_radiance_emerging_from_sea_water_to_downwelling_radiative_flux_in_air"
            }
            Wkv::ReflectanceRatioWater => {
                "surface_ratio_of_upwelling_radiance_emerging_from_sea_water_to_downwelling_radiative_flux_in_water"
            }
            Wkv::BrightnessTemperature => "brightness_temperature",
            Wkv::QualityFlags => "quality_flags",
        }
    }
}

impl std::fmt::Display for Wkv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Single-letter polarisation code carried by passive-microwave products.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum Polarisation {
    H,
    V,
}

impl Polarisation {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'H' => Some(Polarisation::H),
            'V' => Some(Polarisation::V),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Polarisation::H => "H",
            Polarisation::V => "V",
        }
    }
}

impl std::fmt::Display for Polarisation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optical water type the retrieval algorithm was tuned for.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum WaterCase {
    CaseI,
    CaseII,
}

impl std::fmt::Display for WaterCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaterCase::CaseI => write!(f, "I"),
            WaterCase::CaseII => write!(f, "II"),
        }
    }
}
