//! Resolution and loading of files from the prebuilt application directory

use axum::http::HeaderValue;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};
use tracing::debug;

use super::asset_cache::{AssetCache, AssetCacheConfig};
use super::types::{Asset, StaticHostError};
use crate::config::StaticFilesConfig;

/// Serves files out of a single directory, with one designated entry document
pub struct StaticHost {
    root: PathBuf,
    entry_document: String,
    asset_cache_control: HeaderValue,
    cache: AssetCache,
}

impl StaticHost {
    pub fn new(config: &StaticFilesConfig) -> Self {
        let cache = AssetCache::new(AssetCacheConfig {
            max_size_bytes: config.asset_cache_max_size,
            ..AssetCacheConfig::default()
        });

        Self {
            root: config.dir.clone(),
            entry_document: config.entry_document.clone(),
            asset_cache_control: asset_cache_control(config.asset_max_age),
            cache,
        }
    }

    /// Directory the application is served from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the entry document
    pub fn entry_path(&self) -> PathBuf {
        self.root.join(&self.entry_document)
    }

    /// `Cache-Control` value sent with every asset
    pub fn asset_cache_control(&self) -> &HeaderValue {
        &self.asset_cache_control
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    /// Map a request path onto a regular file under the root.
    ///
    /// Returns `None` for anything that should be answered with the entry
    /// document: the root itself, the entry document by name, directories,
    /// missing files, and paths that try to leave the root.
    pub async fn resolve(&self, request_path: &str) -> Option<(PathBuf, Metadata)> {
        let relative = sanitize(request_path)?;
        if relative == Path::new(&self.entry_document) {
            return None;
        }

        let full = self.root.join(&relative);
        match tokio::fs::metadata(&full).await {
            Ok(metadata) if metadata.is_file() => Some((full, metadata)),
            Ok(_) => None,
            Err(e) => {
                debug!("No file for {:?}: {}", relative, e);
                None
            }
        }
    }

    /// Load an asset, hashing it for its ETag on a cache miss
    pub async fn load_asset(
        &self,
        path: &Path,
        metadata: &Metadata,
    ) -> Result<Asset, StaticHostError> {
        let len = metadata.len();
        let modified = modified_nanos(metadata);

        if let Some(asset) = self.cache.get(path, len, modified).await {
            return Ok(asset);
        }

        let body = Bytes::from(tokio::fs::read(path).await?);
        let asset = Asset {
            etag: weak_etag(&body),
            content_type: content_type_for(path),
            body,
            len,
            modified,
        };

        self.cache.insert(path.to_path_buf(), asset.clone()).await;
        Ok(asset)
    }

    /// Read the entry document fresh from disk
    pub async fn entry_document(&self) -> Result<Bytes, StaticHostError> {
        let path = self.entry_path();
        match tokio::fs::read(&path).await {
            Ok(contents) => Ok(Bytes::from(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
                StaticHostError::EntryDocumentMissing(path.display().to_string()),
            ),
            Err(e) => Err(StaticHostError::Io(e)),
        }
    }
}

/// Turn a URL path into a relative filesystem path, rejecting traversal and
/// dotfiles
fn sanitize(request_path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for segment in request_path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if s.starts_with('.') => return None,
            s if s.contains('\\') || s.contains('\0') => return None,
            s => relative.push(s),
        }
    }

    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative)
    }
}

fn asset_cache_control(max_age: Duration) -> HeaderValue {
    HeaderValue::try_from(format!("public, max-age={}", max_age.as_secs()))
        .unwrap_or_else(|_| HeaderValue::from_static("public, max-age=31536000"))
}

/// Weak validator from the first 128 bits of the content's SHA-256
fn weak_etag(body: &[u8]) -> HeaderValue {
    let digest = Sha256::digest(body);
    let hex: String = digest[..16].iter().map(|b| format!("{:02x}", b)).collect();
    HeaderValue::try_from(format!("W/\"{}-{}\"", body.len(), hex))
        .unwrap_or_else(|_| HeaderValue::from_static("W/\"0\""))
}

fn content_type_for(path: &Path) -> HeaderValue {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    HeaderValue::from_str(mime.as_ref())
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"))
}

fn modified_nanos(metadata: &Metadata) -> u128 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}
