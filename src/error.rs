//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, GDAL, and XML errors, and provides semantic variants
//! for mapper dispatch and band-resolution failures.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file does not belong to the product family a mapper handles.
    /// Drives dispatch to the next mapper; not a failure of the file itself.
    #[error("file not recognized by mapper `{mapper}`")]
    RecognitionMismatch { mapper: &'static str },

    /// No registered mapper accepted the file.
    #[error("no mapper recognized the file: {path}")]
    NoMapperMatched { path: String },

    /// Resolution produced an empty band list; an empty virtual raster is
    /// not useful downstream.
    #[error("no recognizable bands found in product")]
    NoRecognizedBands,

    #[error("coordinate sub-dataset not found: {0}")]
    MissingCoordinates(&'static str),

    #[error("longitude shape {lon:?} does not match latitude shape {lat:?}")]
    CoordinateShapeMismatch {
        lon: (usize, usize),
        lat: (usize, usize),
    },

    #[error("mask dimensions {mask:?} do not match geolocation grid {grid:?}")]
    MaskDimensionMismatch {
        mask: (usize, usize),
        grid: (usize, usize),
    },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Processing error: {0}")]
    Processing(String),
}

impl Error {
    pub fn external<E: std::fmt::Display>(e: E) -> Self {
        Error::Processing(e.to_string())
    }
}
