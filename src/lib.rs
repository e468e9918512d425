//! Idempotent caching proxy for chat-completion requests.
//!
//! `POST /proxy` forwards `{proposal_id, timestamp, messages, model}` to the
//! upstream API. Successful replies are cached under
//! `proposal:<proposal_id>:timestamp:<timestamp>` for a fixed TTL, so a repeat
//! of the same pair inside that window is answered without calling upstream.

pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod state;
pub mod upstream;

pub use error::{CacheError, ProxyError};

use crate::config::LogFormat;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging. `RUST_LOG` wins over `level` when set.
pub fn setup_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => subscriber.with(fmt::layer().json()).init(),
        LogFormat::Text => subscriber.with(fmt::layer()).init(),
    }
}
