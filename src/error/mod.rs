use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid environment configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong with the configuration.
        message: String,
    },

    /// Caller input rejected before the pipeline runs.
    #[error("Validation failed: {field} - {reason}")]
    Validation {
        /// Name of the rejected input.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Generation client could not be set up.
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

/// Failure category of a generation call.
///
/// Every [`GenerationError`] maps onto exactly one kind; the kind is what a
/// caller renders next to the failure detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Missing or invalid credential material, detected before any call.
    AuthError,
    /// Connection failure or timeout.
    TransportError,
    /// Non-success status from the remote service.
    BackendError,
    /// Success status but the body lacks the expected text.
    MalformedResponse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::AuthError => "AuthError",
            ErrorKind::TransportError => "TransportError",
            ErrorKind::BackendError => "BackendError",
            ErrorKind::MalformedResponse => "MalformedResponse",
        };
        f.pad(name)
    }
}

/// Generation backend errors
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No usable credential was provided.
    #[error("Missing credential: {message}")]
    MissingCredential {
        /// Which credential is missing.
        message: String,
    },

    /// Credential cannot be sent as an HTTP header.
    #[error("Invalid credential: {message}")]
    InvalidCredential {
        /// Why the credential was rejected; never the secret itself.
        message: String,
    },

    /// The call exceeded the configured ceiling.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Ceiling that was exceeded.
        timeout_ms: u64,
    },

    /// Network or connection failure.
    #[error("Connection failed: {message}")]
    Transport {
        /// Transport error text, without the request URL.
        message: String,
    },

    /// Non-success HTTP status.
    #[error("API error: {status} - {body}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Response body preview.
        body: String,
    },

    /// Body missing the expected text.
    #[error("Invalid response: {message}")]
    MalformedResponse {
        /// What the body was missing.
        message: String,
    },

    /// Underlying reqwest failure.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl GenerationError {
    /// The failure category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::MissingCredential { .. }
            | GenerationError::InvalidCredential { .. } => ErrorKind::AuthError,
            GenerationError::Timeout { .. }
            | GenerationError::Transport { .. }
            | GenerationError::Http(_) => ErrorKind::TransportError,
            GenerationError::Backend { .. } => ErrorKind::BackendError,
            GenerationError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for generation backend operations
pub type BackendResult<T> = Result<T, GenerationError>;
