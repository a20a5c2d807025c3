//! Error types for the composable-seqfilter library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "hts")]
    #[error("Alignment file error: {0}")]
    Hts(#[from] rust_htslib::errors::Error),

    #[error("Sequence search failed: {0}")]
    Search(Box<dyn std::error::Error + Send + Sync>),

    #[error("Invalid parameter for {filter}: {reason}")]
    InvalidParameter { filter: &'static str, reason: String },

    #[error("{filter}: sequence '{record_id}' has no {annotation}")]
    MissingAnnotation {
        filter: &'static str,
        record_id: String,
        annotation: &'static str,
    },

    #[error("{filter}: no read counts for sequence '{record_id}'")]
    MissingReadCount { filter: &'static str, record_id: String },

    #[error("{filter}: unusable read counts for sequence '{record_id}': {reason}")]
    InvalidReadCount {
        filter: &'static str,
        record_id: String,
        reason: String,
    },

    #[error("Sequence '{record_id}': expected {expected} quality values, got {actual}")]
    DimensionMismatch {
        record_id: String,
        expected: usize,
        actual: usize,
    },

    #[error("{filter} requires a {capability}, but none was provided")]
    Unavailable {
        filter: &'static str,
        capability: &'static str,
    },
}

impl FilterError {
    /// Shorthand for a configuration error raised while building a filter.
    pub(crate) fn invalid(filter: &'static str, reason: impl Into<String>) -> Self {
        FilterError::InvalidParameter {
            filter,
            reason: reason.into(),
        }
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, FilterError>;
