//! Static host types and error definitions

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use thiserror::Error;

/// `Cache-Control` for the entry document: every request must revalidate
pub const ENTRY_CACHE_CONTROL: &str =
    "no-store, no-cache, must-revalidate, proxy-revalidate, max-age=0";

/// Errors that can occur while serving the application
#[derive(Debug, Error)]
pub enum StaticHostError {
    #[error("Entry document not found: {0}")]
    EntryDocumentMissing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for StaticHostError {
    fn into_response(self) -> Response {
        let body = match &self {
            StaticHostError::EntryDocumentMissing(_) => "Application entry document is missing",
            StaticHostError::Io(_) => "Failed to read application files",
        };
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CACHE_CONTROL, ENTRY_CACHE_CONTROL)],
            body,
        )
            .into_response()
    }
}

/// A loaded static asset
#[derive(Debug, Clone)]
pub struct Asset {
    /// File contents
    pub body: Bytes,
    /// Weak entity tag derived from a SHA-256 of the contents
    pub etag: HeaderValue,
    /// MIME type guessed from the file extension
    pub content_type: HeaderValue,
    /// File length at load time (used to detect changes on disk)
    pub len: u64,
    /// Modification time at load time, in nanoseconds since the epoch
    pub modified: u128,
}

impl Asset {
    /// Whether an `If-None-Match` header value matches this asset.
    ///
    /// Uses weak comparison: `W/` prefixes are ignored on both sides.
    pub fn matches_if_none_match(&self, if_none_match: &str) -> bool {
        let ours = strip_weak(self.etag.to_str().unwrap_or_default());
        if_none_match
            .split(',')
            .map(str::trim)
            .any(|candidate| candidate == "*" || strip_weak(candidate) == ours)
    }
}

fn strip_weak(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}
