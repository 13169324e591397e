use crate::session::api::{ApiError, AuthApi, AuthResponse};
use crate::session::navigator::Navigator;
use crate::session::state::{AuthStatus, Profile, Session, SessionConfig, SessionView};
use crate::session::storage::{SessionStore, StorageError};
use crate::session::token;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Session manager errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Response did not include an access token")]
    MissingToken,
}

impl SessionError {
    /// The underlying API error, when the failure came from the remote side
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            SessionError::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Session manager: owns the client's authentication state
///
/// Token and profile live in the persistent store; the in-memory copy is
/// published through a watch channel so UI code can observe it through
/// [`SessionView`] without being able to change it.
pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    config: SessionConfig,
    state: watch::Sender<Session>,
}

impl SessionManager {
    pub fn new(
        api: Arc<dyn AuthApi>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self::with_config(api, store, navigator, SessionConfig::default())
    }

    /// Create a manager, hydrating token and profile from the store
    pub fn with_config(
        api: Arc<dyn AuthApi>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        config: SessionConfig,
    ) -> Self {
        let token = store.get(&config.token_key);
        let user = store.get(&config.user_key).and_then(|raw| {
            serde_json::from_str::<Profile>(&raw)
                .inspect_err(|e| warn!("Ignoring unreadable stored profile: {}", e))
                .ok()
        });
        debug!(
            "Hydrated session: token={}, user={}",
            token.is_some(),
            user.is_some()
        );

        let (state, _) = watch::channel(Session {
            token,
            user,
            is_loading: false,
        });

        Self {
            api,
            store,
            navigator,
            config,
            state,
        }
    }

    /// Reactive, read-only view of the session
    pub fn subscribe(&self) -> SessionView {
        SessionView::new(self.state.subscribe())
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<Profile> {
        self.state.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn status(&self) -> AuthStatus {
        if self.is_loading() {
            AuthStatus::Loading
        } else if self.is_authenticated() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Local, unverified check of the stored token. Never touches the network.
    ///
    /// This is advisory, for UI responsiveness only; the API enforces validity.
    pub fn is_authenticated(&self) -> bool {
        self.stored_token()
            .is_some_and(|raw| token::is_token_live(&raw))
    }

    /// Whether the loaded profile lists `permission`
    pub fn can(&self, permission: &str) -> bool {
        self.state
            .borrow()
            .user
            .as_ref()
            .is_some_and(|user| user.has_permission(permission))
    }

    /// Log in, then make a best-effort profile fetch
    ///
    /// Errors from the login call propagate unchanged. A failing follow-up
    /// profile fetch is swallowed and leaves the profile empty.
    pub async fn login(&self, credentials: &Value) -> Result<AuthResponse, SessionError> {
        self.set_loading(true);
        let result = self.login_inner(credentials).await;
        self.set_loading(false);
        result
    }

    async fn login_inner(&self, credentials: &Value) -> Result<AuthResponse, SessionError> {
        let response = self.api.login(credentials).await?;
        let token = response
            .access_token
            .clone()
            .ok_or(SessionError::MissingToken)?;

        self.persist_token(&token)?;
        if let Some(user) = &response.user {
            self.persist_user(user)?;
        }
        self.state.send_modify(|s| {
            s.token = Some(token);
            if let Some(user) = &response.user {
                s.user = Some(user.clone());
            }
        });
        info!("Login succeeded");

        match self.fetch_profile().await {
            Ok(profile) => self.adopt_profile(profile),
            Err(e) => {
                warn!("Profile fetch after login failed: {}", e);
                self.state.send_modify(|s| s.user = None);
            }
        }

        Ok(response)
    }

    /// Register a new account, keeping whatever token/profile comes back
    pub async fn register(&self, payload: &Value) -> Result<AuthResponse, SessionError> {
        self.set_loading(true);
        let result = self.register_inner(payload).await;
        self.set_loading(false);
        result
    }

    async fn register_inner(&self, payload: &Value) -> Result<AuthResponse, SessionError> {
        let response = self.api.register(payload).await?;

        if let Some(token) = &response.access_token {
            self.persist_token(token)?;
        }
        if let Some(user) = &response.user {
            self.persist_user(user)?;
        }
        self.state.send_modify(|s| {
            if let Some(token) = &response.access_token {
                s.token = Some(token.clone());
            }
            if let Some(user) = &response.user {
                s.user = Some(user.clone());
            }
        });
        info!(
            "Registration succeeded (token returned: {})",
            response.access_token.is_some()
        );

        Ok(response)
    }

    /// Best-effort rehydration of the profile. Never fails.
    pub async fn load_user(&self) {
        if !self.is_authenticated() {
            debug!("No valid token, skipping profile fetch");
            self.state.send_modify(|s| s.user = None);
            return;
        }

        self.set_loading(true);
        match self.fetch_profile().await {
            Ok(profile) => self.adopt_profile(profile),
            Err(e) => {
                warn!("Failed to load user: {}", e);
                self.state.send_modify(|s| s.user = None);
            }
        }
        self.set_loading(false);
    }

    /// Fetch the current profile from the API
    ///
    /// If the API rejects the token, the session is logged out before the
    /// error is returned.
    pub async fn fetch_profile(&self) -> Result<Profile, SessionError> {
        let token = self.stored_token();
        match self.api.me(token.as_deref()).await {
            Ok(profile) => Ok(profile),
            Err(e) => {
                if e.is_unauthorized() {
                    warn!("Profile fetch was unauthorized, logging out");
                    self.logout();
                }
                Err(e.into())
            }
        }
    }

    /// Exchange the current token for a new one; any failure logs out
    pub async fn refresh(&self) -> Result<AuthResponse, SessionError> {
        let token = self.stored_token();
        let result = self.refresh_inner(token.as_deref()).await;
        if let Err(e) = &result {
            warn!("Token refresh failed, logging out: {}", e);
            self.logout();
        }
        result
    }

    async fn refresh_inner(&self, token: Option<&str>) -> Result<AuthResponse, SessionError> {
        let response = self.api.refresh(token).await?;
        let new_token = response
            .access_token
            .clone()
            .ok_or(SessionError::MissingToken)?;

        self.persist_token(&new_token)?;
        self.state.send_modify(|s| s.token = Some(new_token));
        debug!("Token refreshed");
        Ok(response)
    }

    /// Clear token and profile everywhere, then navigate to the login route
    pub fn logout(&self) {
        for key in [&self.config.token_key, &self.config.user_key] {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to remove {} from storage: {}", key, e);
            }
        }
        self.state.send_modify(|s| {
            s.token = None;
            s.user = None;
        });

        info!("Logged out");
        self.navigator.navigate(&self.config.login_route);
    }

    fn stored_token(&self) -> Option<String> {
        self.store.get(&self.config.token_key)
    }

    fn set_loading(&self, loading: bool) {
        self.state.send_modify(|s| s.is_loading = loading);
    }

    fn persist_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(&self.config.token_key, token)
    }

    fn persist_user(&self, user: &Profile) -> Result<(), StorageError> {
        let raw = serde_json::to_string(user)?;
        self.store.set(&self.config.user_key, &raw)
    }

    fn adopt_profile(&self, profile: Profile) {
        if let Err(e) = self.persist_user(&profile) {
            warn!("Failed to persist profile: {}", e);
        }
        self.state.send_modify(|s| s.user = Some(profile));
    }
}
