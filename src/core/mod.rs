//! Band-resolution core: product recognition, sibling-file discovery, the
//! Band Resolver itself, and spatial-reference attachment. These building
//! blocks are composed per product family by the `mappers` module.
pub mod descriptor;
pub mod geolocate;
pub mod recognize;
pub mod resolve;
pub mod siblings;

pub use descriptor::{BandDescriptor, BandMeta, VariableMapping};
pub use geolocate::{Gcp, GeoReference, GeoStrategy, WGS84_WKT};
pub use recognize::{Expect, MetadataRule, Recognizer};
pub use resolve::{
    DerivedRatioRule, FrequencyRules, MaskRule, ReflectanceRule, ResolveStrategy, SubDatasetRules,
};
pub use siblings::{Sibling, SiblingPattern};
