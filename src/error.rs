//! Error types for the smartcab crate

use thiserror::Error;

/// Main error type for the smartcab crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("state '{state}' has no action values (ensure it before lookup)")]
    UnknownState { state: String },

    #[error("percept is missing required field '{field}'")]
    MalformedPercept { field: String },

    #[error("unknown {kind} symbol '{value}'")]
    UnknownSymbol { kind: String, value: String },

    #[error("valid action set is empty")]
    EmptyActionSet,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("no trial in progress (call reset first)")]
    NoActiveTrial,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    /// Shorthand for configuration failures.
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
