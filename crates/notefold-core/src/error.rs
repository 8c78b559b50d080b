//! Error types for notefold-core

use thiserror::Error;

/// Result type alias using notefold-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in notefold-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or rejected credential
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Remote service answered with a non-success status
    #[error("Remote service error: {message} (HTTP {status})")]
    Api { status: u16, message: String },

    /// Transport failure (connect, timeout, body decode)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Note or folder not present in the local collection
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential store error
    #[error("Credential store error: {0}")]
    CredentialStore(String),
}

/// Coarse classification used by front ends to pick a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    Network,
    Validation,
    NotFound,
    Internal,
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth(_) => ErrorKind::Auth,
            Self::Api { .. } | Self::Network(_) => ErrorKind::Network,
            Self::InvalidInput(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Serialization(_) | Self::Config(_) | Self::CredentialStore(_) => {
                ErrorKind::Internal
            }
        }
    }

    #[must_use]
    pub fn not_signed_in() -> Self {
        Self::Auth("not signed in; run `notefold login` first".to_string())
    }
}
