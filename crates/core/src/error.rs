//! Error types for bf-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for bf-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bf-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// A named credential environment variable is not set
    #[error("Credential variable {variable} is not set")]
    CredentialResolution { variable: String },

    /// The requested object does not exist in the bucket
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Object bytes could not be decoded or parsed into a table
    #[error("Decode error: {0}")]
    Decode(String),

    /// A table could not be serialized
    #[error("Encode error: {0}")]
    Encode(String),

    /// Format tag outside of `csv` / `parquet`
    #[error("Unsupported format '{format}'{}", for_key(.key))]
    UnsupportedFormat { format: String, key: Option<String> },

    /// The upload of an object failed
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Columns that do not form a valid table
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),
}

fn for_key(key: &Option<String>) -> String {
    key.as_ref()
        .map(|k| format!(" (writing {k})"))
        .unwrap_or_default()
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_)
            | Error::InvalidUrl(_)
            | Error::TomlParse(_)
            | Error::InvalidTable(_) => 2, // UsageError
            Error::Network(_) | Error::Upload(_) => 3, // NetworkError
            Error::CredentialResolution { .. } => 4,   // AuthError
            Error::ObjectNotFound(_) => 5,              // NotFound
            Error::UnsupportedFormat { .. } => 7,       // UnsupportedFormat
            _ => 1,                                     // GeneralError
        }
    }
}
