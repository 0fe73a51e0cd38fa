//! Error handling for Visual Phenomics processing operations.
//!
//! Provides typed errors with context for ingestion, parameter
//! calculation, cache persistence and export failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhenomicsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Path not found: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Unknown parameter '{name}'. Known parameters: {known}")]
    UnknownParameter { name: String, known: String },

    #[error("Cannot calculate '{parameter}': missing column(s) {columns}")]
    MissingColumns { parameter: String, columns: String },

    #[error("The following column(s) cannot be exported: {columns}")]
    ReservedColumns { columns: String },

    #[error("The following column(s) cannot be found in the DataFrame: {columns}")]
    ColumnsNotFound { columns: String },

    #[error("Unknown protocol '{name}', select: dark, flat, sinusoidal or fluctuating")]
    UnknownProtocol { name: String },

    #[error("Unknown compression '{name}', select: zip, zstd, snappy, lz4 or uncompressed")]
    UnknownCompression { name: String },
}

impl PhenomicsError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a missing-columns error naming the absent logical inputs
    pub fn missing_columns(parameter: impl Into<String>, columns: &[String]) -> Self {
        Self::MissingColumns {
            parameter: parameter.into(),
            columns: columns.join(", "),
        }
    }
}

pub type Result<T> = std::result::Result<T, PhenomicsError>;
