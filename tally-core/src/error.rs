//! Crate error type.

use std::io;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by the pipeline, the frame helpers and the notebook adapter.
#[derive(Debug, Error)]
pub enum TallyError {
    /// A required column is absent from a table.
    #[error("column '{column}' not found")]
    MissingColumn { column: String },

    /// A date-like value could not be turned into a calendar date.
    #[error("cannot parse '{value}' in column '{column}' as a date: {source}")]
    DateParse {
        column: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A cell that must be numeric (summed or divided) is not.
    #[error("non-numeric value '{value}' in column '{column}'")]
    NonNumeric { column: String, value: String },

    /// An integer column sums past the range of `i64`.
    #[error("sum of column '{column}' overflows a 64-bit integer")]
    Overflow { column: String },

    /// A derived column would shadow a column the table already has.
    #[error("column '{column}' already exists")]
    DuplicateColumn { column: String },

    #[error(transparent)]
    Frame(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("malformed notebook: {0}")]
    Notebook(String),
}

impl TallyError {
    pub(crate) fn missing(column: impl Into<String>) -> Self {
        TallyError::MissingColumn {
            column: column.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TallyError>;
