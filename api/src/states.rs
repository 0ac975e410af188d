use crate::{cache::PageCache, config::Config, store::Store};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{num::NonZeroU32, sync::Arc};

// ============================================================================
// APPLICATION STATE - Shared data across all requests
// ============================================================================
/// Cloned into every handler; all fields are `Arc`s so a clone is cheap and
/// every request sees the same store, cache and limiter.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub page_cache: Arc<PageCache>,
    pub config: Arc<Config>,
    /// Login attempts per email
    pub login_limiter: Arc<DefaultKeyedRateLimiter<String>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let attempts =
            NonZeroU32::new(config.login_attempts_per_minute).unwrap_or(NonZeroU32::MIN);

        Self {
            store: Arc::new(Store::new()),
            page_cache: Arc::new(PageCache::new(config.index_cache_ttl)),
            login_limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(attempts))),
            config: Arc::new(config),
        }
    }
}
