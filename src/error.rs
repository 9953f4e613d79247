//! Error types for vocabulary enrichment
//!
//! This module provides error handling using thiserror for structured error
//! definitions and anyhow for propagation at the binary edge.

use thiserror::Error;

/// Main error type for enrichment operations
#[derive(Error, Debug)]
pub enum EnrichError {
    /// A required column is missing from the input table
    #[error("Expected a '{0}' column in the input file")]
    MissingColumn(String),

    /// File extension is not a supported spreadsheet format
    #[error("Unsupported spreadsheet format: {0}")]
    UnsupportedFormat(String),

    /// Reading a workbook failed
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Writing an xlsx workbook failed
    #[error("Xlsx write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Reading or writing CSV failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Lookup endpoint answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Endpoint URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration values out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl EnrichError {
    /// Whether the failure is the kind a later run could plausibly succeed on
    /// (timeouts, connection trouble, throttling, server errors).
    pub fn is_transient(&self) -> bool {
        match self {
            EnrichError::Http(e) => e.is_timeout() || e.is_connect(),
            EnrichError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<calamine::Error> for EnrichError {
    fn from(err: calamine::Error) -> Self {
        EnrichError::Spreadsheet(err.to_string())
    }
}

/// Result type alias for enrichment operations
pub type Result<T> = std::result::Result<T, EnrichError>;

/// Convert anyhow::Error to EnrichError
impl From<anyhow::Error> for EnrichError {
    fn from(err: anyhow::Error) -> Self {
        EnrichError::Other(err.to_string())
    }
}
