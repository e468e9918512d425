use anyhow::{Context, bail};
use clap::Parser;
use proposal_proxy::cache::{KvStore, MemoryStore, expiry_sweeper};
use proposal_proxy::config::{Args, CacheBackend};
use proposal_proxy::handlers::{ops_router, router};
use proposal_proxy::setup_tracing;
use proposal_proxy::state::AppState;
use proposal_proxy::upstream::UpstreamClient;
use std::sync::Arc;

// Bind the configured store; `None` runs the proxy without a cache
async fn build_store(args: &Args) -> anyhow::Result<Option<Arc<dyn KvStore>>> {
    match args.cache_backend {
        CacheBackend::Memory => {
            let store = Arc::new(MemoryStore::new());
            tokio::spawn(expiry_sweeper(store.clone(), args.sweep_interval()));
            Ok(Some(store as Arc<dyn KvStore>))
        }
        CacheBackend::Disabled => {
            tracing::warn!("cache backend disabled, every request goes upstream");
            Ok(None)
        }
        CacheBackend::Redis => connect_redis(args).await,
    }
}

#[cfg(feature = "redis")]
async fn connect_redis(args: &Args) -> anyhow::Result<Option<Arc<dyn KvStore>>> {
    use proposal_proxy::cache::RedisStore;

    let Some(url) = args.redis_url.as_deref() else {
        bail!("--redis-url is required for the redis cache backend");
    };
    let store = RedisStore::connect(url)
        .await
        .context("failed to connect to redis")?;
    tracing::info!("connected to redis cache");
    Ok(Some(Arc::new(store) as Arc<dyn KvStore>))
}

#[cfg(not(feature = "redis"))]
async fn connect_redis(_args: &Args) -> anyhow::Result<Option<Arc<dyn KvStore>>> {
    bail!("this binary was built without the `redis` feature")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // parse cli arguments
    let args = Args::parse();
    setup_tracing(&args.log_level, args.log_format);

    let cache = build_store(&args).await?;
    let upstream = UpstreamClient::new(reqwest::Client::new(), &args.upstream_url, &args.api_key);
    let state = Arc::new(AppState::new(upstream, cache, args.cache_ttl()));

    if let Some(ops_port) = args.ops_port {
        let addr = format!("{}:{}", args.host, ops_port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind ops listener on {addr}"))?;
        tracing::info!(%addr, "ops endpoints (/health, /metrics) listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, ops_router()).await {
                tracing::error!(error = %e, "ops listener stopped");
            }
        });
    }

    let addr = args.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, upstream = %args.upstream_url, "proxy listening");
    tracing::info!(
        ttl_secs = args.cache_ttl,
        backend = ?args.cache_backend,
        "cache configured"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
