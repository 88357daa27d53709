// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Only configuration, ingestion and CLI argument handling can fail. Tier
//! resolution, offers and both schedulers are total and never return these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcureError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// A column role required by ingestion is not present in the dataset.
    #[error("Missing column for role '{role}': '{column}' not found in dataset headers")]
    MissingColumn { role: String, column: String },

    #[error("Component not found: {0}")]
    UnknownComponent(String),

    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<calamine::XlsxError> for ProcureError {
    fn from(err: calamine::XlsxError) -> Self {
        ProcureError::Spreadsheet(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProcureError>;
