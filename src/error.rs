use std::path::PathBuf;
use thiserror::Error;

/// The main error type for wheatset operations.
#[derive(Debug, Error)]
pub enum WheatsetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing {kind} for '{basename}' under {dir}")]
    MissingResource {
        kind: &'static str,
        basename: String,
        dir: PathBuf,
    },

    #[error("malformed annotation in {path} at row {row}: {source}")]
    MalformedAnnotation {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("cannot read dimensions of image {path}: {source}")]
    ImageProbe {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("failed to parse JSON from {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read CSV {path}: {source}")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: {message}")]
    InvalidDocument { path: PathBuf, message: String },

    #[error("unsupported annotation source: '{0}' (supported: csv, json)")]
    UnsupportedSource(String),

    #[error("validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
    },
}
