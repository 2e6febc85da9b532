//! GlobColour merged Level-3 mapped products. One observation is spread over
//! several single-variable NetCDF files sharing the first 30 characters of
//! the file name; each contributes its `*_mean` sub-dataset. Normalized
//! water-leaving radiance bands additionally yield a derived water-reflectance
//! ratio, and the `_flags` sub-dataset is condensed into a quality mask.
use crate::core::descriptor::VariableMapping;
use crate::core::geolocate::{GeoStrategy, WGS84_WKT};
use crate::core::recognize::{MetadataRule, Recognizer};
use crate::core::resolve::{DerivedRatioRule, MaskRule, ResolveStrategy, SubDatasetRules};
use crate::core::siblings::SiblingPattern;
use crate::mappers::Mapper;
use crate::types::Wkv;

/// Date/identifier prefix length shared by the files of one observation.
const PREFIX_LEN: usize = 30;

fn variable_table() -> Vec<VariableMapping> {
    vec![
        VariableMapping::new("CHL1_mean", Wkv::ChlorophyllA),
        VariableMapping::new("KD490_mean", Wkv::DownwellingAttenuation).wavelength("490"),
        VariableMapping::new("TSM_mean", Wkv::SuspendedMatter),
        VariableMapping::new("CDM_mean", Wkv::CdomAbsorption),
        VariableMapping::new("T865_mean", Wkv::AerosolOpticalThickness).wavelength("865"),
        VariableMapping::new("L412_mean", Wkv::UpwellingRadiance)
            .band_name("nLw_412")
            .wavelength("412"),
        VariableMapping::new("L443_mean", Wkv::UpwellingRadiance)
            .band_name("nLw_443")
            .wavelength("443"),
        VariableMapping::new("L490_mean", Wkv::UpwellingRadiance)
            .band_name("nLw_490")
            .wavelength("490"),
        VariableMapping::new("L510_mean", Wkv::UpwellingRadiance)
            .band_name("nLw_510")
            .wavelength("510"),
        VariableMapping::new("L555_mean", Wkv::UpwellingRadiance)
            .band_name("nLw_555")
            .wavelength("555"),
        VariableMapping::new("L620_mean", Wkv::UpwellingRadiance)
            .band_name("nLw_620")
            .wavelength("620"),
        VariableMapping::new("L670_mean", Wkv::UpwellingRadiance)
            .band_name("nLw_670")
            .wavelength("670"),
        VariableMapping::new("L681_mean", Wkv::UpwellingRadiance)
            .band_name("nLw_681")
            .wavelength("681"),
    ]
}

pub fn mapper() -> Mapper {
    Mapper::new(
        "globcolour_l3",
        Recognizer::new(vec![MetadataRule::contains("NC_GLOBAL#title", "GlobColour")]),
        SiblingPattern::SharedPrefix {
            prefix_len: PREFIX_LEN,
        },
        ResolveStrategy::SubDatasets(SubDatasetRules {
            reflectance: None,
            mappings: variable_table(),
            derived_ratio: Some(DerivedRatioRule {
                trigger: Wkv::UpwellingRadiance,
                ratio_wkv: Wkv::ReflectanceRatioWater,
                irradiance_key: "solar_irradiance",
            }),
            mask: Some(MaskRule {
                description_match: "_flags",
            }),
            scale_key: "scale_factor",
            offset_key: "add_offset",
        }),
        GeoStrategy::GridFromReference {
            projection: WGS84_WKT,
        },
    )
}
