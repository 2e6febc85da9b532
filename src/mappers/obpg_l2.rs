//! Ocean-color Level-2 swath products (OBPG processing, HMODISA). Bands are
//! recognized per sub-dataset inside the single input file: the Rrs_NNN
//! reflectance family by naming convention, the rest through a fixed table.
//! Georeferencing comes from the embedded longitude/latitude arrays, either
//! sampled into ground control points or recorded as geolocation arrays.
use crate::core::descriptor::VariableMapping;
use crate::core::geolocate::GeoStrategy;
use crate::core::recognize::{MetadataRule, Recognizer};
use crate::core::resolve::{ReflectanceRule, ResolveStrategy, SubDatasetRules};
use crate::core::siblings::SiblingPattern;
use crate::mappers::Mapper;
use crate::types::{WaterCase, Wkv};

const GCP_COUNT: usize = 1000;

fn variable_table() -> Vec<VariableMapping> {
    vec![
        VariableMapping::new("Kd_490", Wkv::DownwellingAttenuation).wavelength("490"),
        VariableMapping::new("chlor_a", Wkv::ChlorophyllA)
            .band_name("algal_1")
            .case(WaterCase::CaseI),
        VariableMapping::new("cdom_index", Wkv::CdomAbsorption)
            .band_name("yellow_subs")
            .case(WaterCase::CaseII),
        VariableMapping::new("l2_flags", Wkv::QualityFlags).data_type(5),
    ]
}

fn rules() -> SubDatasetRules {
    SubDatasetRules {
        reflectance: Some(ReflectanceRule::rrs()),
        mappings: variable_table(),
        derived_ratio: None,
        mask: None,
        scale_key: "slope",
        offset_key: "intercept",
    }
}

fn recognizer() -> Recognizer {
    Recognizer::new(vec![MetadataRule::equals("Title", "HMODISA Level-2 Data")])
}

/// Default construction: lat/lon arrays sampled into ground control points.
pub fn mapper() -> Mapper {
    Mapper::new(
        "obpg_l2",
        recognizer(),
        SiblingPattern::SelfOnly,
        ResolveStrategy::SubDatasets(rules()),
        GeoStrategy::GcpsFromLatLon {
            lon_match: "longitude",
            lat_match: "latitude",
            gcp_count: GCP_COUNT,
        },
    )
    .with_time_key("NC_GLOBAL#time_coverage_start")
}

/// Alternate construction: keep the per-pixel coordinate arrays as a lazy
/// geolocation reference instead of materializing GCPs.
pub fn mapper_with_geolocation_arrays() -> Mapper {
    Mapper::new(
        "obpg_l2",
        recognizer(),
        SiblingPattern::SelfOnly,
        ResolveStrategy::SubDatasets(rules()),
        GeoStrategy::GeolocationArrays {
            lon_match: "longitude",
            lat_match: "latitude",
        },
    )
    .with_time_key("NC_GLOBAL#time_coverage_start")
}
