//! Remote authentication API
//!
//! The session manager only talks to the API through the `AuthApi` trait;
//! `HttpAuthApi` is the real implementation over `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::state::Profile;

/// Errors returned by the remote API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether the server rejected the presented token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            ApiError::Decode(_) => None,
        }
    }
}

/// Body returned by login, register and refresh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Profile>,
    /// Any other fields the API sends along
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Remote endpoints the session manager depends on
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// POST /auth/login
    async fn login(&self, credentials: &Value) -> Result<AuthResponse, ApiError>;

    /// POST /auth/register
    async fn register(&self, payload: &Value) -> Result<AuthResponse, ApiError>;

    /// GET /auth/me
    async fn me(&self, token: Option<&str>) -> Result<Profile, ApiError>;

    /// POST /auth/refresh
    async fn refresh(&self, token: Option<&str>) -> Result<AuthResponse, ApiError>;
}

/// Configuration for `HttpAuthApi`
#[derive(Debug, Clone)]
pub struct HttpAuthApiConfig {
    /// Base URL the `/auth/*` paths are appended to
    pub base_url: String,
    /// Per-request timeout; `None` leaves it to the transport
    pub timeout: Option<Duration>,
}

impl HttpAuthApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }
}

/// `AuthApi` over HTTP with JSON bodies and bearer authentication
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(config: HttpAuthApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Value) -> Result<AuthResponse, ApiError> {
        self.send(Method::POST, "/auth/login", None, Some(credentials))
            .await
    }

    async fn register(&self, payload: &Value) -> Result<AuthResponse, ApiError> {
        self.send(Method::POST, "/auth/register", None, Some(payload))
            .await
    }

    async fn me(&self, token: Option<&str>) -> Result<Profile, ApiError> {
        self.send(Method::GET, "/auth/me", token, None).await
    }

    async fn refresh(&self, token: Option<&str>) -> Result<AuthResponse, ApiError> {
        self.send(Method::POST, "/auth/refresh", token, None).await
    }
}
