//! Error types for name classification.

use thiserror::Error;

/// Errors raised while classifying archive names.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    /// The name carries none of the recognized archive extensions.
    #[error("file format not supported for extraction: {path}")]
    UnsupportedFormat {
        /// The path whose extension was not recognized.
        path: String,
    },
}

impl ClassifyError {
    /// Creates an unsupported-format error.
    pub fn unsupported_format(path: impl Into<String>) -> Self {
        Self::UnsupportedFormat { path: path.into() }
    }
}
