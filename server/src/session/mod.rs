//! Client-side session management
//!
//! This module provides:
//! - `SessionManager`, the single owner of token, profile and loading state
//! - `SessionView`, a read-only reactive projection for UI code
//! - `AuthApi` / `HttpAuthApi` for the remote `/auth/*` endpoints
//! - `SessionStore` implementations standing in for browser storage
//! - unverified expiry inspection of compact bearer tokens

pub mod api;
pub mod manager;
pub mod navigator;
pub mod state;
pub mod storage;
pub mod token;

pub use api::{ApiError, AuthApi, AuthResponse, HttpAuthApi, HttpAuthApiConfig};
pub use manager::{SessionError, SessionManager};
pub use navigator::{Navigator, RecordingNavigator, TracingNavigator};
pub use state::{AuthStatus, Profile, Session, SessionConfig, SessionView};
pub use storage::{FileStore, MemoryStore, SessionStore, StorageError};
pub use token::{Claims, TokenError, decode_claims, is_token_live};
