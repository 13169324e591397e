use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::watch;

/// Default storage key for the raw bearer token
pub const DEFAULT_TOKEN_KEY: &str = "chat_token";
/// Default storage key for the serialized profile
pub const DEFAULT_USER_KEY: &str = "user";
/// Default route navigated to on logout
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// The authenticated user's record, as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(pub Map<String, Value>);

impl Profile {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Permission names, when `permissions` is present and is a sequence
    pub fn permissions(&self) -> Option<&Vec<Value>> {
        match self.0.get("permissions") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        }
    }

    /// Plain membership test: no wildcards, no hierarchy
    pub fn has_permission(&self, name: &str) -> bool {
        self.permissions()
            .is_some_and(|items| items.iter().any(|item| item.as_str() == Some(name)))
    }
}

impl From<Map<String, Value>> for Profile {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// In-memory session data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<Profile>,
    /// Advisory only: overlapping operations are not prevented
    pub is_loading: bool,
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Unauthenticated,
    Loading,
    Authenticated,
}

/// Session manager configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub token_key: String,
    pub user_key: String,
    pub login_route: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            user_key: DEFAULT_USER_KEY.to_string(),
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
        }
    }
}

/// Read-only, reactive projection of the session for UI code
#[derive(Debug, Clone)]
pub struct SessionView {
    rx: watch::Receiver<Session>,
}

impl SessionView {
    pub(crate) fn new(rx: watch::Receiver<Session>) -> Self {
        Self { rx }
    }

    /// Current session data
    pub fn snapshot(&self) -> Session {
        self.rx.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.rx.borrow().token.clone()
    }

    pub fn user(&self) -> Option<Profile> {
        self.rx.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.rx.borrow().is_loading
    }

    /// Status derived from the in-memory token and loading flag
    pub fn status(&self) -> AuthStatus {
        let session = self.rx.borrow();
        if session.is_loading {
            AuthStatus::Loading
        } else if session
            .token
            .as_deref()
            .is_some_and(super::token::is_token_live)
        {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }

    /// Wait until the session changes. Returns `false` once the manager is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// Get current timestamp in milliseconds
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
