//! Admission check service implementation.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{debug, warn};

use crate::ratelimit::{Decision, LimiterRegistry, Scope};

/// Header carrying the authenticated principal id, set by the platform
/// front end after session validation.
pub const PRINCIPAL_HEADER: &str = "x-principal-id";

/// Build the service router.
pub fn router(registry: Arc<LimiterRegistry>) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/v1/check/{scope}", post(check))
        .with_state(registry)
}

/// Liveness probe.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Decide whether a request in `scope` may proceed.
///
/// Admitted requests get a 200 with the decision body, rejected ones a
/// 429. Both carry the `X-RateLimit-Limit`, `X-RateLimit-Remaining`,
/// and `X-RateLimit-Reset` headers; the reject-to-429 translation lives
/// here, not in the limiter.
async fn check(
    State(registry): State<Arc<LimiterRegistry>>,
    Path(scope): Path<String>,
    headers: HeaderMap,
) -> Response {
    let scope: Scope = match scope.parse() {
        Ok(scope) => scope,
        Err(e) => {
            warn!(error = %e, "Rejected admission check for unknown scope");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let principal = header_string(&headers, PRINCIPAL_HEADER);
    let remote_addr = client_addr(&headers);

    let decision = registry.check(scope, principal.as_deref(), remote_addr.as_deref());
    if !decision.admitted {
        debug!(scope = %scope, "Admission check rejected");
    }

    decision_response(decision)
}

fn decision_response(decision: Decision) -> Response {
    let status = if decision.admitted {
        StatusCode::OK
    } else {
        StatusCode::TOO_MANY_REQUESTS
    };

    let mut response = (status, Json(decision)).into_response();
    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(decision.reset_at_ms));
    response
}

/// Client address from forwarding headers: first hop of
/// `x-forwarded-for`, then `x-real-ip`. The service sits behind the
/// platform front end, so the TCP peer is never the real client.
fn client_addr(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return Some(first.to_string());
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .filter(|v| !v.is_empty())
}
