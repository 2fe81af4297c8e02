use thiserror::Error;

/// Unified error type for the gateway.
/// This aggregates all low-level errors into actionable, high-level categories
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Target not found: {key}")]
    TargetNotFound { key: String },

    #[error("Target registry not initialized")]
    NotInitialized,

    #[error("Producer error: {message}")]
    Producer { message: String },

    #[error("Network transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation {
            message: msg.into(),
        }
    }

    /// Create a new producer error
    pub fn producer(msg: impl Into<String>) -> Self {
        Error::Producer {
            message: msg.into(),
        }
    }

    pub fn target_not_found(key: impl Into<String>) -> Self {
        Error::TargetNotFound { key: key.into() }
    }
}
