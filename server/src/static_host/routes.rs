//! HTTP handlers for the application files
//!
//! Every path resolves to one of two responses:
//! - a content-hashed asset with a long max-age and an ETag, or
//! - the entry document, which must never be cached so that clients always
//!   pick up the current asset hashes.

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use metrics::counter;
use std::sync::Arc;

use super::service::StaticHost;
use super::types::{ENTRY_CACHE_CONTROL, StaticHostError};

/// GET / - always the entry document
pub async fn serve_root(State(host): State<Arc<StaticHost>>) -> Response {
    serve_entry(&host).await
}

/// GET /*path - an asset if one exists, otherwise the entry document
pub async fn serve_path(
    State(host): State<Arc<StaticHost>>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some((file, metadata)) = host.resolve(&path).await else {
        return serve_entry(&host).await;
    };

    let asset = match host.load_asset(&file, &metadata).await {
        Ok(asset) => asset,
        Err(e) => {
            tracing::error!("Failed to load asset {:?}: {}", file, e);
            return e.into_response();
        }
    };

    let mut response_headers = HeaderMap::new();
    response_headers.insert(header::CONTENT_TYPE, asset.content_type.clone());
    response_headers.insert(header::CACHE_CONTROL, host.asset_cache_control().clone());
    response_headers.insert(header::ETAG, asset.etag.clone());

    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| asset.matches_if_none_match(v));

    if not_modified {
        counter!("spa_host_asset_not_modified_total").increment(1);
        return (StatusCode::NOT_MODIFIED, response_headers).into_response();
    }

    counter!("spa_host_asset_hits_total").increment(1);
    (StatusCode::OK, response_headers, asset.body).into_response()
}

/// Answer with the entry document under the non-cacheable policy
async fn serve_entry(host: &StaticHost) -> Response {
    match host.entry_document().await {
        Ok(body) => {
            counter!("spa_host_entry_fallbacks_total").increment(1);
            (
                StatusCode::OK,
                [
                    (
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("text/html; charset=utf-8"),
                    ),
                    (
                        header::CACHE_CONTROL,
                        HeaderValue::from_static(ENTRY_CACHE_CONTROL),
                    ),
                    (header::PRAGMA, HeaderValue::from_static("no-cache")),
                    (header::EXPIRES, HeaderValue::from_static("0")),
                ],
                body,
            )
                .into_response()
        }
        Err(e) => {
            if matches!(e, StaticHostError::EntryDocumentMissing(_)) {
                counter!("spa_host_entry_missing_total").increment(1);
            }
            tracing::error!("Cannot serve entry document: {}", e);
            e.into_response()
        }
    }
}

/// Build the routes serving the application files
pub fn static_routes(host: Arc<StaticHost>) -> Router {
    Router::new()
        .route("/", get(serve_root))
        .route("/*path", get(serve_path))
        .with_state(host)
}
