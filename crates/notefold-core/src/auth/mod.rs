//! Credential handling and account operations.
//!
//! The notes API authenticates every call with a single bearer token. Front
//! ends decide where the token lives by implementing [`CredentialStore`];
//! [`AccountClient`] signs in/out and keeps the store in step.

mod account;

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub use account::AccountClient;

/// Bearer token issued by `/signin`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token; blank values are rejected.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::Auth("access token must not be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("AccessToken([REDACTED])")
    }
}

/// Storage for the single bearer token.
pub trait CredentialStore: Clone + Send + Sync + 'static {
    fn load_token(&self) -> Result<Option<AccessToken>>;
    fn save_token(&self, token: &AccessToken) -> Result<()>;
    fn clear_token(&self) -> Result<()>;
}

/// Process-lifetime token store.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    token: Arc<Mutex<Option<AccessToken>>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: AccessToken) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token))),
        }
    }
}

impl fmt::Debug for MemoryCredentialStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("MemoryCredentialStore").finish_non_exhaustive()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load_token(&self) -> Result<Option<AccessToken>> {
        let guard = self
            .token
            .lock()
            .map_err(|error| Error::CredentialStore(error.to_string()))?;
        Ok(guard.clone())
    }

    fn save_token(&self, token: &AccessToken) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|error| Error::CredentialStore(error.to_string()))?;
        *guard = Some(token.clone());
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|error| Error::CredentialStore(error.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Load the token or fail with an auth error before any network call.
pub fn require_token<C: CredentialStore>(store: &C) -> Result<AccessToken> {
    store.load_token()?.ok_or_else(Error::not_signed_in)
}
