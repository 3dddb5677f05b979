use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Anything that prevents a file from becoming a [`StudentDataset`].
///
/// [`StudentDataset`]: crate::data::model::StudentDataset
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}, row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    /// Structural problems (bad CSV quoting, wrong JSON shape, unreadable Parquet).
    #[error("{path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidFilterError {
    #[error("inverted range for {column}: {min} > {max}")]
    InvertedRange { column: String, min: f64, max: f64 },

    #[error("range bound for {column} is not a finite number")]
    NonFiniteBound { column: String },

    #[error("'{value}' is not an observed value of {column}")]
    UnknownCategory { column: String, value: String },

    #[error("{0} cannot be filtered")]
    NotFilterable(String),
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// An aggregate needing at least one record got none.
    #[error("no records available for {0}")]
    EmptyInput(String),

    /// Correlation needs two or more records and non-zero variance.
    #[error("insufficient data for {column}: {reason}")]
    InsufficientData { column: String, reason: String },
}
