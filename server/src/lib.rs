//! SPA Host Library
//!
//! This module exports the static host and the client session manager for use
//! in integration tests and embedding applications.

pub mod config;
pub mod server;
pub mod session;
pub mod static_host;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use server::{AppState, build_app};
pub use session::manager::SessionManager;
pub use static_host::{StaticHost, static_routes};
