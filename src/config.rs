use clap::{Parser, ValueEnum};
use std::time::Duration;
use crate::upstream::DEFAULT_UPSTREAM_URL;

// Where cached replies live
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Redis,
    // no store bound, every lookup is a miss
    Disabled,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "proposal-proxy")]
#[command(about = "Idempotent caching proxy for chat-completion requests")]
pub struct Args {
    // Address to bind on
    #[arg(long, env = "PROXY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    // Port to run the proxy on
    #[arg(short, long, env = "PROXY_PORT", default_value_t = 8080)]
    pub port: u16,

    // Chat-completion endpoint
    #[arg(short, long, env = "UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    // Upstream credential, never printed
    #[arg(long, env = "DEEPSEEK_API_KEY", hide_env_values = true)]
    pub api_key: String,

    // Cache TTL in seconds
    #[arg(short, long, env = "CACHE_TTL_SECS", default_value_t = 300)]
    pub cache_ttl: u64,

    #[arg(long, env = "CACHE_BACKEND", value_enum, default_value_t = CacheBackend::Memory)]
    pub cache_backend: CacheBackend,

    // Only read by the redis backend
    #[arg(long, env = "REDIS_URL")]
    pub redis_url: Option<String>,

    // Expired entry sweep interval in seconds (memory backend)
    #[arg(long, env = "CACHE_SWEEP_SECS", default_value_t = 60)]
    pub sweep_interval: u64,

    // Optional second listener for /health and /metrics
    #[arg(long, env = "OPS_PORT")]
    pub ops_port: Option<u16>,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Args {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn sweep_interval(&self) -> Duration {
        // a zero interval would panic in tokio::time::interval
        Duration::from_secs(self.sweep_interval.max(1))
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
