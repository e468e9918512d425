use std::sync::Arc;
use std::time::Duration;
use crate::cache::KvStore;
use crate::upstream::UpstreamClient;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

// app's shared state
pub struct AppState {
    pub upstream: UpstreamClient,
    pub cache: Option<Arc<dyn KvStore>>, // None when no store is bound
    pub ttl: Duration,                   // how long a cached reply stays valid
}

impl AppState {
    pub fn new(upstream: UpstreamClient, cache: Option<Arc<dyn KvStore>>, ttl: Duration) -> Self {
        Self { upstream, cache, ttl }
    }
}
