//! AMSR2 Level-3 gridded brightness temperatures (GCOM-W1). One overpass is
//! split into one HDF file per channel frequency; the frequency code sits at
//! a fixed position in the file name. All channels land on the documented
//! NSIDC polar-stereographic 10 km grid, so georeferencing is a constant.
use crate::core::geolocate::GeoStrategy;
use crate::core::recognize::{MetadataRule, Recognizer};
use crate::core::resolve::{FrequencyRules, ResolveStrategy};
use crate::core::siblings::SiblingPattern;
use crate::mappers::Mapper;
use crate::types::Wkv;

/// Channel frequencies (GHz, rounded) a product set may carry.
const FREQUENCIES: &[u32] = &[6, 7, 10, 18, 23, 36, 89];

/// Vendor-documented brightness-temperature calibration.
const TB_SCALE: f64 = 0.009_999_999_8;

/// NSIDC Sea Ice Polar Stereographic North, 10 km cells.
const GRID_TRANSFORM: [f64; 6] = [-3_850_000.0, 10_000.0, 0.0, 5_850_000.0, 0.0, -10_000.0];
const GRID_PROJECTION: &str = "EPSG:3411";
const GRID_SIZE: (usize, usize) = (760, 1120);

pub fn mapper() -> Mapper {
    Mapper::new(
        "amsr2_l3",
        Recognizer::new(vec![
            MetadataRule::equals("PlatformShortName", "GCOM-W1"),
            MetadataRule::equals("SensorShortName", "AMSR2"),
            MetadataRule::equals("ProductName", "AMSR2-L3"),
        ]),
        SiblingPattern::FrequencySplice {
            start: 30,
            end: 32,
            frequencies: FREQUENCIES,
        },
        ResolveStrategy::FrequencyBands(FrequencyRules {
            locator_match: "Brightness_Temperature",
            wkv: Wkv::BrightnessTemperature,
            scale: TB_SCALE,
        }),
        GeoStrategy::FixedGrid {
            transform: GRID_TRANSFORM,
            projection: GRID_PROJECTION,
            size: GRID_SIZE,
        },
    )
    .with_time_key("ObservationStartDateTime")
}
