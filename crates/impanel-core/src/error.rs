//! Error types for impanel-core
//!
//! Provides error handling for:
//! - Catalog enumeration and filtering
//! - Layout and display mode options
//! - Glyph scale computation
//! - Source and I/O failures during a build
//!
//! A failed pipeline build never leaves a partially-built scene displayed;
//! every error here surfaces before the scene is committed.

use impanel_source::{SchemaError, SourceError};
use thiserror::Error;

/// Main error type for impanel operations
#[derive(Debug, Error)]
pub enum CoreError {
    /// Catalog enumeration errors
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Glyph scale computation errors
    #[error("scale error: {0}")]
    Scale(#[from] ScaleError),

    /// Unknown layout/scalar/vector mode string, rejected before any
    /// renderer call
    #[error("bad value of {option} parameter: {value}")]
    InvalidModeOption { option: &'static str, value: String },

    /// Schema strings from an external catalog failed to parse
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Data source errors
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// I/O errors (snapshot paths, output directories)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to catalog enumeration
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An explicit include-list matched nothing
    #[error("no matching fields: {requested:?} not in {available:?}")]
    NoMatchingFields {
        requested: Vec<String>,
        available: Vec<String>,
    },
}

/// Errors related to glyph scale computation
#[derive(Debug, Error)]
pub enum ScaleError {
    /// The data range has zero width; an explicit range must be supplied
    #[error("degenerate data range: min == max == {value}")]
    DegenerateRange { value: f64 },
}

/// Result type alias for impanel operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result type alias for scale computations
pub type ScaleResult<T> = Result<T, ScaleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_mode_option_display() {
        let err = CoreError::InvalidModeOption {
            option: "scalar_mode",
            value: "streamlines".to_string(),
        };
        assert!(err.to_string().contains("scalar_mode"));
        assert!(err.to_string().contains("streamlines"));
    }

    #[test]
    fn test_no_matching_fields_display() {
        let err = CatalogError::NoMatchingFields {
            requested: vec!["temperature".to_string()],
            available: vec!["pressure".to_string()],
        };
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_degenerate_range_display() {
        let err = ScaleError::DegenerateRange { value: 1.5 };
        assert!(err.to_string().contains("1.5"));
    }
}
