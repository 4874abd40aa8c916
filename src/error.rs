//! Error types for chartkit operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring, laying out, or encoding charts.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Invalid dimensions for a framebuffer or chart surface.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Series lengths disagree where index-wise alignment is required.
    #[error("Series length mismatch: expected {expected} points, found {found}")]
    SeriesLengthMismatch {
        /// Point count of the reference series.
        expected: usize,
        /// Point count of the offending series.
        found: usize,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Scale domain error (collapsed domain, non-positive band count, ...).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// Color parsing error.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Unknown theme name.
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// Malformed series payload.
    #[error("Series decode error: {0}")]
    SeriesDecode(#[from] serde_json::Error),

    /// Rendering error.
    #[error("Rendering error: {0}")]
    Rendering(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDimensions {
            width: 0,
            height: 100,
        };
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn test_series_length_mismatch_display() {
        let err = Error::SeriesLengthMismatch {
            expected: 10,
            found: 7,
        };
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("7"));
    }

    #[test]
    fn test_unknown_theme_display() {
        assert!(Error::UnknownTheme("sepia".into())
            .to_string()
            .contains("sepia"));
    }
}
