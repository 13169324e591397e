//! Test Utilities Module
//!
//! Fixtures shared by the unit tests: a scripted `AuthApi` and a token builder.
//! This module is only compiled when running tests.

#![cfg(test)]

use crate::session::api::{ApiError, AuthApi, AuthResponse};
use crate::session::state::Profile;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// ============================================================================
// Tokens
// ============================================================================

/// Build an unsigned compact token carrying `claims` as its payload
pub fn make_token(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}

// ============================================================================
// Scripted API
// ============================================================================

/// Canned reply for one endpoint
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
}

impl Reply {
    pub fn json(value: Value) -> Self {
        Reply::Json(value)
    }

    pub fn status(code: u16) -> Self {
        Reply::Status(code)
    }

    fn into_result<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            Reply::Json(value) => Ok(serde_json::from_value(value)?),
            Reply::Status(code) => Err(ApiError::Status {
                status: StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                body: String::new(),
            }),
        }
    }
}

/// `AuthApi` that answers from a script and records every call
#[derive(Debug)]
pub struct MockAuthApi {
    login: Reply,
    register: Reply,
    me: Reply,
    refresh: Reply,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<(&'static str, Option<String>)>>,
}

impl MockAuthApi {
    /// Every endpoint answers 500 until scripted
    pub fn new() -> Self {
        Self {
            login: Reply::Status(500),
            register: Reply::Status(500),
            me: Reply::Status(500),
            refresh: Reply::Status(500),
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_login(mut self, reply: Reply) -> Self {
        self.login = reply;
        self
    }

    pub fn with_register(mut self, reply: Reply) -> Self {
        self.register = reply;
        self
    }

    pub fn with_me(mut self, reply: Reply) -> Self {
        self.me = reply;
        self
    }

    pub fn with_refresh(mut self, reply: Reply) -> Self {
        self.refresh = reply;
        self
    }

    /// Hold `login` until the gate is notified
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Endpoint names in call order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| *name)
            .collect()
    }

    /// Bearer tokens presented to `endpoint`, in call order
    pub fn tokens_seen(&self, endpoint: &str) -> Vec<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| *name == endpoint)
            .map(|(_, token)| token.clone())
            .collect()
    }

    fn record(&self, endpoint: &'static str, token: Option<&str>) {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint, token.map(str::to_string)));
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, _credentials: &Value) -> Result<AuthResponse, ApiError> {
        self.record("login", None);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.login.clone().into_result()
    }

    async fn register(&self, _payload: &Value) -> Result<AuthResponse, ApiError> {
        self.record("register", None);
        self.register.clone().into_result()
    }

    async fn me(&self, token: Option<&str>) -> Result<Profile, ApiError> {
        self.record("me", token);
        self.me.clone().into_result()
    }

    async fn refresh(&self, token: Option<&str>) -> Result<AuthResponse, ApiError> {
        self.record("refresh", token);
        self.refresh.clone().into_result()
    }
}
