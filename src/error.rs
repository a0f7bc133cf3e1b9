use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a file on disk into a [`crate::data::SurveyTable`].
///
/// All of these are fatal: nothing is rendered without a table.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset not found: {}", path.display())]
    DatasetNotFound { path: PathBuf },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("decoding arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("row {row}: {reason}")]
    Malformed { row: usize, reason: String },
}

/// Failures of a single aggregation. These are isolated per chart.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    #[error("column '{0}' is not present in the dataset")]
    MissingColumn(String),

    /// The denominator row-set is empty; there is nothing to take a share of.
    #[error("no data: '{0}' has no rows to aggregate")]
    EmptyBase(String),

    #[error("column '{column}' holds non-numeric value '{value}'")]
    NonNumeric { column: String, value: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
