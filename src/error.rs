use std::io;

use thiserror::Error;

/// Caller contract violations in the filter/aggregation pipeline.
///
/// An empty result is not an error; see [`crate::data::summary::Summary`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("'{0}' is not a region in the geography vocabulary")]
    InvalidRegion(String),
    #[error("{view} requires a selected region")]
    MissingRequiredRegion { view: &'static str },
    #[error("'{value}' is not a known {kind}")]
    UnknownCategory { kind: &'static str, value: String },
}

/// Failures while reading a dataset file into an [`crate::data::model::ExecutionTable`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: column '{column}' is empty")]
    MissingValue { row: usize, column: &'static str },
    #[error("row {row}: cannot derive a 4-digit year from '{value}'")]
    Date { row: usize, value: String },
    #[error("row {row}: '{value}' is not a valid {column}")]
    Vocabulary {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("row {row}: '{value}' in column '{column}' is not a count")]
    Count {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("expected a top-level JSON array of records")]
    JsonShape,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
}
