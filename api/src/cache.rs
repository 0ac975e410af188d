//! Whole-response cache for the index page.
//!
//! Entries live for a fixed TTL and are never invalidated by writes; a new
//! post shows up once the entry expires or the cache is cleared.

use crate::{AppState, errors::ApiError};
use axum::{
    body::{Body, Bytes, to_bytes},
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, Uri, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};
use tracing::{debug, info};

/// A stored response body
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub body: Bytes,
    pub content_type: String,
    pub expires_at: Instant,
}

impl CacheEntry {
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

impl IntoResponse for CacheEntry {
    fn into_response(self) -> Response {
        let content_type = HeaderValue::from_str(&self.content_type)
            .unwrap_or(HeaderValue::from_static("application/json"));
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type)],
            self.body,
        )
            .into_response()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

pub struct PageCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key, "Cache hit");
                return Some(entry.clone());
            }
            drop(entry);
            self.entries.remove(key);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key, "Cache miss");
        None
    }

    pub fn set(&self, key: &str, body: Bytes, content_type: &str, ttl: Duration) {
        debug!(key, ttl_secs = ttl.as_secs(), "Cache set");
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                body,
                content_type: content_type.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
    }

    pub fn clear(&self) {
        self.entries.clear();
        info!("Page cache cleared");
    }

    /// Drops expired entries, returning how many went
    pub fn cleanup(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(removed, "Expired cache entries removed");
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Path plus query, so every page number caches separately
pub fn cache_key(uri: &Uri) -> String {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    format!("page:{}", path)
}

/// Read-through middleware: serves a live entry without running the
/// handler, otherwise stores the handler's successful response.
pub async fn cache_page(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let cache = &state.page_cache;
    let key = cache_key(request.uri());
    if let Some(entry) = cache.get(&key) {
        return entry.into_response();
    }

    let response = next.run(request).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return ApiError::InternalError(format!("Failed to buffer response: {}", e))
                .into_response();
        }
    };
    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json");

    cache.set(&key, bytes.clone(), content_type, cache.ttl());

    Response::from_parts(parts, Body::from(bytes))
}
