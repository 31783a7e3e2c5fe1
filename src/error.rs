//! Error types for geo2sql.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for geo2sql operations.
#[derive(Debug, Error)]
pub enum Geo2SqlError {
    /// The input file does not exist.
    #[error("The file '{}' was not found", path.display())]
    MissingFile { path: PathBuf },

    /// The input is not JSON, or not shaped like a feature collection.
    #[error("The file '{}' is not a valid GeoJSON feature collection: {source}", path.display())]
    MalformedJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A feature of the expected kind carries unusable coordinates.
    #[error("Feature #{index} has invalid coordinates: {message}")]
    InvalidGeometry { index: usize, message: String },

    /// The collection holds no feature of the geometry the job needs.
    #[error("No {expected} features were found in the file")]
    NoMatchingFeatures { expected: &'static str },

    /// Missing or contradictory job settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A config file that could not be parsed.
    #[error("Invalid config file '{}': {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Geometry could not be rendered back to JSON.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Geo2SqlError {
    /// Create an invalid geometry error for the feature at `index`.
    pub fn geometry(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            index,
            message: message.into(),
        }
    }

    /// Whether this is the "nothing to convert" warning rather than a failure.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::NoMatchingFeatures { .. })
    }
}

/// Result type alias for geo2sql operations.
pub type Geo2SqlResult<T> = Result<T, Geo2SqlError>;
