//! Shared HTTP plumbing for the notes API.

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::auth::AccessToken;
use crate::config::ClientConfig;
use crate::util::compact_text;
use crate::{Error, Result};

/// Base URL plus a configured `reqwest` client.
#[derive(Debug, Clone)]
pub struct ApiTransport {
    base_url: String,
    client: Client,
}

impl ApiTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            base_url: config.api_base_url.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&AccessToken>,
    ) -> RequestBuilder {
        let request = self
            .client
            .request(method, self.url(path))
            .header(ACCEPT, "application/json");
        match token {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        }
    }

    pub(crate) async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response> {
        tracing::debug!(operation, "Sending notes API request");
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = status_error(status, &body);
        tracing::debug!(operation, status = status.as_u16(), "Notes API request rejected");
        Err(error)
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = self.send(operation, request).await?;
        Ok(response.json::<T>().await?)
    }

    pub(crate) async fn send_empty(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<()> {
        self.send(operation, request).await.map(|_| ())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
    msg: Option<String>,
}

pub(crate) fn status_error(status: StatusCode, body: &str) -> Error {
    let message = parse_api_message(status, body);
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Error::Auth(message)
    } else {
        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

fn parse_api_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error).or(payload.msg) {
            return compact_text(&message);
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {}", status.as_u16()), ToString::to_string)
    } else {
        trimmed
    }
}
