//! Error types for the merchant ledger.

use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while loading, filtering or exporting transactions.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Report bytes were not valid UTF-8
    #[error("Report is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A transaction row violates the record invariants
    #[error("Invalid transaction {id}: {message}")]
    InvalidRecord { id: String, message: String },

    /// Transaction ID already present in the ledger
    #[error("Duplicate transaction ID {id}")]
    DuplicateId { id: String },

    /// The ledger holds no records at all
    #[error("No transactions available")]
    DataUnavailable,

    /// A filter value could not be parsed
    #[error("Invalid {field} filter: {value:?}")]
    InvalidFilter { field: &'static str, value: String },

    /// A timestamp could not be parsed
    #[error("Invalid timestamp {0:?}, expected YYYY-MM-DD HH:MM or RFC 3339")]
    InvalidTimestamp(String),
}

/// Errors raised while loading the YAML configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid YAML for the expected shape
    #[error("Invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A field holds a value outside its allowed range
    #[error("Invalid config value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}
