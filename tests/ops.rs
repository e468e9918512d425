//! Health and metrics endpoints

use axum::body::Body;
use axum::http::{Request, StatusCode};
use proposal_proxy::handlers::ops_router;
use tower::ServiceExt;

async fn get(uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = ops_router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health_reports_healthy() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_metrics_exposes_proxy_counters() {
    proposal_proxy::metrics::REQUEST_TOTAL.inc();

    let (status, body) = get("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("proxy_requests_total"), "{body}");
}

#[tokio::test]
async fn test_ops_router_has_no_proxy_route() {
    let (status, body) = get("/proxy").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Invalid endpoint");
}
