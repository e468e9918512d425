use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;
use crate::cache::cache_key;
use crate::error::ProxyError;
use crate::metrics::{CACHE_HITS, CACHE_MISSES, CACHE_UNAVAILABLE, REQUEST_TOTAL, UPSTREAM_ERRORS};
use crate::models::RawProposalRequest;
use crate::state::AppState;

// Look up a cached reply; an unusable store is treated as a miss
async fn lookup(state: &AppState, key: &str) -> Option<String> {
    let Some(cache) = state.cache.as_ref() else {
        CACHE_UNAVAILABLE.inc();
        tracing::debug!(cache_key = %key, "no cache store bound, proceeding without cache");
        return None;
    };

    match cache.get(key).await {
        // an empty body is never a usable reply
        Ok(hit) => hit.filter(|body| !body.is_empty()),
        Err(e) => {
            tracing::warn!(cache_key = %key, error = %e, "cache read failed, treating as miss");
            None
        }
    }
}

async fn store(state: &AppState, key: &str, body: &str) {
    let Some(cache) = state.cache.as_ref() else {
        return;
    };

    if let Err(e) = cache.put(key, body.to_string(), state.ttl).await {
        tracing::warn!(cache_key = %key, error = %e, "cache write failed");
    }
}

// /proxy, any method
pub async fn proxy_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, String), ProxyError> {
    REQUEST_TOTAL.inc();
    tracing::debug!(bytes = body.len(), "proxy request received");

    let request = RawProposalRequest::from_slice(&body)
        .inspect_err(|e| tracing::error!(error = %e, "failed to parse request body"))?
        .validate()?;

    tracing::info!(
        proposal_id = %request.proposal_id,
        timestamp = %request.timestamp,
        model = %request.model,
        messages = request.messages.len(),
        "parsed proxy request"
    );

    let key = cache_key(&request.proposal_id, &request.timestamp);

    if let Some(cached) = lookup(&state, &key).await {
        CACHE_HITS.inc();
        tracing::info!(cache_key = %key, "cache hit");
        return Ok((StatusCode::OK, cached));
    }
    CACHE_MISSES.inc();
    tracing::info!(cache_key = %key, upstream = state.upstream.url(), "cache miss, calling upstream");

    let reply = state.upstream.send(&request).await.inspect_err(|e| {
        UPSTREAM_ERRORS.inc();
        tracing::error!(error = %e, "upstream request failed");
    })?;

    tracing::info!(status = reply.status.as_u16(), "upstream responded");

    if !reply.is_success() {
        UPSTREAM_ERRORS.inc();
        tracing::warn!(status = reply.status.as_u16(), body = %reply.body, "upstream returned an error");
        return Err(ProxyError::Upstream {
            status: reply.status,
            body: reply.body,
        });
    }

    store(&state, &key, &reply.body).await;

    Ok((StatusCode::OK, reply.body))
}
