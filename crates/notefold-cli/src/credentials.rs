//! Keychain-backed token storage, one entry per CLI profile.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use notefold_core::{AccessToken, CredentialStore, Error, Result};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "notefold-cli";

#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    username: String,
}

impl KeyringCredentialStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            username: format!("access_token:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| Error::CredentialStore(error.to_string()))
    }
}

impl CredentialStore for KeyringCredentialStore {
    #[cfg(not(test))]
    fn load_token(&self) -> Result<Option<AccessToken>> {
        match self.entry()?.get_password() {
            Ok(raw) => AccessToken::new(raw).map(Some),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::CredentialStore(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load_token(&self) -> Result<Option<AccessToken>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| Error::CredentialStore(error.to_string()))?;
        guard.get(&self.username).cloned().map(AccessToken::new).transpose()
    }

    #[cfg(not(test))]
    fn save_token(&self, token: &AccessToken) -> Result<()> {
        self.entry()?
            .set_password(token.expose())
            .map_err(|error| Error::CredentialStore(error.to_string()))
    }

    #[cfg(test)]
    fn save_token(&self, token: &AccessToken) -> Result<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::CredentialStore(error.to_string()))?;
        guard.insert(self.username.clone(), token.expose().to_string());
        Ok(())
    }

    #[cfg(not(test))]
    fn clear_token(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(Error::CredentialStore(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear_token(&self) -> Result<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::CredentialStore(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}
