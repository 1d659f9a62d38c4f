//! Result and error types for Esperar.

use thiserror::Error;

/// Result type for Esperar operations
pub type EsperarResult<T> = Result<T, EsperarError>;

/// Errors that can occur in Esperar
#[derive(Debug, Error)]
pub enum EsperarError {
    /// Remote read failed (element or mock backend unavailable)
    #[error("Remote read failed: {message}")]
    Remote {
        /// Error message
        message: String,
    },

    /// Host assertion framework could not be initialized
    #[error("Host framework init failed: {message}")]
    HostInit {
        /// Error message
        message: String,
    },

    /// Matcher was registered twice or looked up under an unknown name
    #[error("Unknown matcher: {name}")]
    UnknownMatcher {
        /// Matcher name
        name: String,
    },

    /// A filter or expected value could not be interpreted
    #[error("Invalid filter: {message}")]
    InvalidFilter {
        /// Error message
        message: String,
    },

    /// Regex pattern error
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EsperarError {
    /// Create a remote-read error
    #[must_use]
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }
}
