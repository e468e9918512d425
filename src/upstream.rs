use axum::http::StatusCode;
use std::time::Instant;
use crate::metrics::UPSTREAM_LATENCY;
use crate::models::ProposalRequest;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.deepseek.com/chat/completions";

// Buffered upstream answer
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Client for the chat-completion API. One POST per call, no retries,
/// the whole body is read before returning.
pub struct UpstreamClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl UpstreamClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn send(&self, request: &ProposalRequest) -> Result<UpstreamReply, reqwest::Error> {
        let start_time = Instant::now();

        let res = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        UPSTREAM_LATENCY.observe(start_time.elapsed().as_secs_f64());

        Ok(UpstreamReply { status, body })
    }
}
