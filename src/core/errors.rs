//! Error types for the detection pipeline.
//!
//! `DetectError` covers both fatal conditions (a missing root path, an
//! invalid configuration, an unreadable PDF) and conditions the batch
//! orchestrator downgrades to per-item skips (a corrupt image, an
//! unrecognized channel layout, a failed page render). Which category an
//! error falls into is decided by the orchestrator, not the error type;
//! see the pipeline module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while detecting structures in images and PDFs.
#[derive(Debug, Error)]
pub enum DetectError {
    /// A path (root folder, input file, or PDF) does not exist.
    #[error("path not found: {path}")]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The image has a channel layout the binarizer does not recognize.
    #[error("unsupported format: {reason}")]
    UnsupportedFormat {
        /// Description of the unsupported layout.
        reason: String,
    },

    /// An image file could not be decoded.
    #[error("failed to decode '{path}'")]
    Decode {
        /// The file that failed to decode.
        path: PathBuf,
        /// The underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// A PDF document could not be opened or read.
    #[error("pdf: {message}")]
    Pdf {
        /// Description of the failure.
        message: String,
    },

    /// A single PDF page failed to render.
    #[error("failed to render page {page}: {message}")]
    PdfRender {
        /// 1-based page number.
        page: usize,
        /// Description of the render failure.
        message: String,
    },

    /// The detection configuration is invalid.
    #[error("configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),

    /// Error from the image codec layer.
    #[error("image")]
    Image(#[from] image::ImageError),

    /// JSON serialization error.
    #[error("serialization")]
    Serialize(#[from] serde_json::Error),
}

impl DetectError {
    /// Creates a configuration error for an out-of-range field value.
    pub fn invalid_field(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl std::fmt::Display,
    ) -> Self {
        Self::Config {
            message: format!(
                "invalid value for '{}': expected {}, got {}",
                field.into(),
                expected.into(),
                actual
            ),
        }
    }

    /// Creates an unsupported-format error for a channel count the
    /// binarizer does not recognize.
    pub fn unsupported_channels(channels: u8) -> Self {
        Self::UnsupportedFormat {
            reason: format!("unrecognized channel count {channels}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_field_mentions_field_and_bounds() {
        let err = DetectError::invalid_field("min_line_width_ratio", "0.0..=1.0", 1.5);
        let msg = err.to_string();
        assert!(msg.contains("min_line_width_ratio"));
        assert!(msg.contains("0.0..=1.0"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn unsupported_channels_names_the_count() {
        let err = DetectError::unsupported_channels(5);
        assert!(err.to_string().contains('5'));
    }
}
