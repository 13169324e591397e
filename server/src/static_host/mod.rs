//! Static host for the single-page application
//!
//! This module provides:
//! - `StaticHost` for resolving request paths against the build directory
//! - `AssetCache` for keeping hashed assets in memory
//! - HTTP routes with a catch-all fallback to the entry document

mod asset_cache;
pub mod routes;
mod service;
mod types;

pub use asset_cache::{AssetCache, AssetCacheConfig, AssetCacheStats};
pub use routes::static_routes;
pub use service::StaticHost;
pub use types::{Asset, ENTRY_CACHE_CONTROL, StaticHostError};
