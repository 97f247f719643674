//! Error types for PRA delineation

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for PRA raster operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown forest type '{0}' (expected stems, pcc, bav, sen2cc or no_forest)")]
    UnknownForestType(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layer '{0}' has already been produced")]
    DuplicateLayer(String),

    #[error("Layer '{0}' has not been produced")]
    MissingLayer(String),

    #[error("Failed to read raster {path}: {reason}")]
    RasterRead { path: PathBuf, reason: String },

    #[error("Failed to write raster {path} (left interrupted): {reason}")]
    RasterWrite { path: PathBuf, reason: String },

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`]
    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for PRA operations
pub type Result<T> = std::result::Result<T, Error>;
