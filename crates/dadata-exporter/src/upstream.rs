//! Authenticated client for the Dadata profile API.
//!
//! - One blocking `ureq` agent per client (connections are reused by the agent).
//! - Every request carries `Authorization: Token ...` and `X-Secret: ...`.
//! - Non-2xx statuses are classified here, not by the HTTP library:
//!   403 -> `Auth`, other non-200 -> `Upstream { status }`.
//! - No retries; one attempt per call.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use ureq::Body;

use dadata_core::api;
use dadata_core::error::{DadataError, Result};

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const SECRET_HEADER: &str = "X-Secret";

/// Endpoint + token/secret pair. Immutable once validated.
#[derive(Clone)]
pub struct Credentials {
    base_url: String,
    token: String,
    secret: String,
}

impl Credentials {
    /// Validate in declaration order: url, token, secret.
    pub fn new(base_url: &str, token: &str, secret: &str) -> Result<Self> {
        if base_url.is_empty() {
            return Err(DadataError::MissingField { field: "url" });
        }
        if token.is_empty() {
            return Err(DadataError::MissingField { field: "token" });
        }
        if secret.is_empty() {
            return Err(DadataError::MissingField { field: "x-secret" });
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            secret: secret.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("secret", &"<redacted>")
            .finish()
    }
}

pub struct UpstreamClient {
    creds: Credentials,
    agent: ureq::Agent,
}

impl UpstreamClient {
    /// `timeout` of `None` keeps the transport defaults.
    pub fn new(creds: Credentials, timeout: Option<Duration>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(timeout)
            .http_status_as_error(false)
            .build()
            .into();
        Self { creds, agent }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.creds
    }

    /// GET `{base_url}/{path}` and return the body of a 200 response.
    ///
    /// The body holds the connection until dropped.
    pub fn fetch(&self, path: &str) -> Result<Body> {
        let url = format!("{}/{}", self.creds.base_url, path);

        let resp = self
            .agent
            .get(url.as_str())
            .header(AUTHORIZATION_HEADER, format!("Token {}", self.creds.token))
            .header(SECRET_HEADER, self.creds.secret.as_str())
            .call()
            .map_err(|e| {
                tracing::debug!(%path, error = %e, "upstream request failed");
                DadataError::transport(path, e)
            })?;

        match resp.status().as_u16() {
            200 => Ok(resp.into_body()),
            403 => Err(DadataError::Auth {
                path: path.to_string(),
            }),
            status => Err(DadataError::Upstream {
                path: path.to_string(),
                status,
            }),
        }
    }

    /// `fetch` + read the whole body + decode it as `T`.
    ///
    /// Only a failed read is a transport error; bytes that are not the
    /// expected JSON (invalid UTF-8 included) are a decode error.
    pub fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let mut body = self.fetch(path)?;
        let bytes = body
            .read_to_vec()
            .map_err(|e| DadataError::transport(path, e))?;
        api::decode_slice(path, &bytes)
    }
}
