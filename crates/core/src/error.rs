//! Error types for velogrid

use thiserror::Error;

/// Main error type for velogrid operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    Geojson(String),

    #[error("CRS mismatch: {0} vs {1}")]
    CrsMismatch(String, String),

    #[error("Empty layer: {0}")]
    EmptyLayer(&'static str),

    #[error("Missing field '{field}' on feature {feature}")]
    MissingField { field: String, feature: usize },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("{0}")]
    Other(String),
}

impl From<geojson::Error> for Error {
    fn from(e: geojson::Error) -> Self {
        Error::Geojson(e.to_string())
    }
}

/// Result type alias for velogrid operations
pub type Result<T> = std::result::Result<T, Error>;
