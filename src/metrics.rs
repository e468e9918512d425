use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("proxy_requests_total", "Total number of proxy requests")
            .expect("register proxy_requests_total");
    pub static ref CACHE_HITS: Counter =
        register_counter!("proxy_cache_hits_total", "Total cache hits")
            .expect("register proxy_cache_hits_total");
    pub static ref CACHE_MISSES: Counter =
        register_counter!("proxy_cache_misses_total", "Total cache misses")
            .expect("register proxy_cache_misses_total");
    pub static ref CACHE_UNAVAILABLE: Counter = register_counter!(
        "proxy_cache_unavailable_total",
        "Requests served without a usable cache store"
    )
    .expect("register proxy_cache_unavailable_total");
    pub static ref UPSTREAM_ERRORS: Counter = register_counter!(
        "proxy_upstream_errors_total",
        "Upstream calls that failed or returned a non-success status"
    )
    .expect("register proxy_upstream_errors_total");
    pub static ref UPSTREAM_LATENCY: Histogram = register_histogram!(
        "proxy_upstream_latency_seconds",
        "Upstream call latency in seconds"
    )
    .expect("register proxy_upstream_latency_seconds");
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("proxy_cache_size", "Current number of items in the in-memory cache")
            .expect("register proxy_cache_size");
}
