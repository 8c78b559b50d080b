//! Account endpoints: sign-in, registration, profile, and account removal.

use reqwest::Method;
use serde::Deserialize;

use super::{require_token, AccessToken, CredentialStore};
use crate::config::ClientConfig;
use crate::models::{ProfileUpdateBody, SignUpRequest, UserProfile};
use crate::remote::ApiTransport;
use crate::{Error, Result};

const PATH_SIGN_IN: &str = "/signin";
const PATH_SIGN_UP: &str = "/signup";
const PATH_PROFILE: &str = "/obtenerdatosusuario";
const PATH_UPDATE_PROFILE: &str = "/modificarnombre";
const PATH_DELETE_ALL_NOTES: &str = "/borrarnotasdeusuario";
const PATH_DELETE_ACCOUNT: &str = "/borrarusuario";

/// Account operations bound to a credential store.
#[derive(Clone)]
pub struct AccountClient<C: CredentialStore> {
    transport: ApiTransport,
    store: C,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SignUpResponse {
    username: Option<String>,
}

impl<C: CredentialStore> AccountClient<C> {
    pub fn new(config: &ClientConfig, store: C) -> Result<Self> {
        Ok(Self {
            transport: ApiTransport::new(config)?,
            store,
        })
    }

    pub const fn store(&self) -> &C {
        &self.store
    }

    pub fn is_signed_in(&self) -> Result<bool> {
        Ok(self.store.load_token()?.is_some())
    }

    /// Exchange email/password for a token and persist it.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AccessToken> {
        validate_credentials(email, password)?;

        let request = self
            .transport
            .request(Method::POST, PATH_SIGN_IN, None)
            .json(&serde_json::json!({
                "email": email.trim(),
                "password": password,
            }));
        let response: SignInResponse = self.transport.send_json("sign_in", request).await?;
        let token = response
            .token
            .ok_or_else(|| Error::Auth("sign-in response did not include a token".to_string()))
            .and_then(AccessToken::new)?;

        self.store.save_token(&token)?;
        tracing::info!("Signed in");
        Ok(token)
    }

    /// Register a new account. Does not sign in.
    ///
    /// Returns the username echoed by the service.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<String> {
        validate_credentials(&request.email, &request.password)?;
        if request.username.trim().is_empty() {
            return Err(Error::InvalidInput("username is required".to_string()));
        }

        let http_request = self
            .transport
            .request(Method::POST, PATH_SIGN_UP, None)
            .json(request);
        let response: SignUpResponse = self.transport.send_json("sign_up", http_request).await?;
        Ok(response
            .username
            .unwrap_or_else(|| request.username.clone()))
    }

    /// Forget the stored token. The service has no logout endpoint.
    pub fn sign_out(&self) -> Result<()> {
        self.store.clear_token()?;
        tracing::info!("Signed out");
        Ok(())
    }

    pub async fn fetch_profile(&self) -> Result<UserProfile> {
        let token = require_token(&self.store)?;
        let request = self
            .transport
            .request(Method::GET, PATH_PROFILE, Some(&token));
        self.transport.send_json("fetch_profile", request).await
    }

    pub async fn update_profile(&self, profile: &UserProfile) -> Result<()> {
        let token = require_token(&self.store)?;
        let request = self
            .transport
            .request(Method::PUT, PATH_UPDATE_PROFILE, Some(&token))
            .json(&ProfileUpdateBody::from(profile));
        self.transport.send_empty("update_profile", request).await
    }

    /// Delete every note owned by the signed-in user.
    pub async fn delete_all_notes(&self) -> Result<()> {
        let token = require_token(&self.store)?;
        let request = self
            .transport
            .request(Method::DELETE, PATH_DELETE_ALL_NOTES, Some(&token));
        self.transport.send_empty("delete_all_notes", request).await
    }

    /// Delete the account and clear the stored token on success.
    pub async fn delete_account(&self) -> Result<()> {
        let token = require_token(&self.store)?;
        let request = self
            .transport
            .request(Method::DELETE, PATH_DELETE_ACCOUNT, Some(&token));
        self.transport.send_empty("delete_account", request).await?;
        self.store.clear_token()?;
        tracing::info!("Account deleted");
        Ok(())
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(Error::InvalidInput("email is required".to_string()));
    }
    if password.trim().is_empty() {
        return Err(Error::InvalidInput("password is required".to_string()));
    }
    Ok(())
}
