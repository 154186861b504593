use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::models::RateLimitPolicy;
use super::services::RateLimitStore;
use crate::core::error::AppError;

/// Identifier of the calling client, resolved from proxy headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

/// State handed to [`rate_limit_middleware`]
#[derive(Clone)]
pub struct RateLimitGuard {
    pub store: Arc<RateLimitStore>,
    pub policy: RateLimitPolicy,
}

impl RateLimitGuard {
    pub fn new(store: Arc<RateLimitStore>, policy: RateLimitPolicy) -> Self {
        Self { store, policy }
    }
}

/// First `X-Forwarded-For` hop, then `X-Real-IP`, then "unknown"
pub fn client_identifier(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Whole seconds until `reset_time`, rounded up and at least 1
pub fn retry_after_secs(reset_time: i64, now: i64) -> u64 {
    let millis = reset_time.saturating_sub(now).max(0) as u64;
    millis.div_ceil(1000).max(1)
}

pub async fn rate_limit_middleware(
    State(guard): State<RateLimitGuard>,
    ClientIp(identifier): ClientIp,
    req: Request,
    next: Next,
) -> Response {
    let RateLimitPolicy {
        max_requests,
        window,
    } = guard.policy;
    let decision = guard.store.check(&identifier, max_requests, window);

    if decision.limited {
        let retry_after = retry_after_secs(decision.reset_time, guard.store.now_millis());
        tracing::warn!(
            "Rate limit exceeded for {} on {}, retry after {}s",
            identifier,
            req.uri().path(),
            retry_after
        );
        return AppError::RateLimitExceeded {
            retry_after,
            limit: max_requests,
            reset_time: decision.reset_time,
        }
        .into_response();
    }

    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(max_requests));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(decision.reset_time));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::rate_limits::services::ManualClock;
    use axum::http::{HeaderName, StatusCode};
    use axum::{routing::get, Router};
    use axum_test::{TestResponse, TestServer};
    use serde_json::Value;
    use std::time::Duration;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_client_identifier_precedence() {
        assert_eq!(
            client_identifier(&headers(&[
                ("x-forwarded-for", " 203.0.113.7 , 10.0.0.1"),
                ("x-real-ip", "198.51.100.2"),
            ])),
            "203.0.113.7"
        );
        assert_eq!(
            client_identifier(&headers(&[("x-real-ip", "198.51.100.2")])),
            "198.51.100.2"
        );
        assert_eq!(client_identifier(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn test_retry_after_rounds_up() {
        assert_eq!(retry_after_secs(10_000, 0), 10);
        assert_eq!(retry_after_secs(10_001, 0), 11);
        assert_eq!(retry_after_secs(500, 0), 1);
        assert_eq!(retry_after_secs(0, 10), 1);
    }

    fn limited_server(clock: Arc<ManualClock>) -> TestServer {
        let store = Arc::new(RateLimitStore::with_clock(clock));
        let guard = RateLimitGuard::new(store, RateLimitPolicy::new(2, Duration::from_secs(60)));
        let app = Router::new()
            .route("/limited", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                guard,
                rate_limit_middleware,
            ));
        TestServer::new(app).unwrap()
    }

    async fn call(server: &TestServer, ip: &'static str) -> TestResponse {
        server
            .get("/limited")
            .add_header(
                HeaderName::from_static("x-forwarded-for"),
                HeaderValue::from_static(ip),
            )
            .await
    }

    fn header(response: &TestResponse, name: &str) -> String {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn test_middleware_decorates_and_limits() {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let server = limited_server(clock.clone());

        let first = call(&server, "203.0.113.7").await;
        first.assert_status_ok();
        assert_eq!(header(&first, "x-ratelimit-limit"), "2");
        assert_eq!(header(&first, "x-ratelimit-remaining"), "1");
        assert_eq!(header(&first, "x-ratelimit-reset"), "1060000");

        call(&server, "203.0.113.7").await.assert_status_ok();

        clock.advance(15_500);
        let third = call(&server, "203.0.113.7").await;
        third.assert_status(StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(header(&third, "retry-after"), "45");
        assert_eq!(header(&third, "x-ratelimit-remaining"), "0");

        let body: Value = third.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["data"]["retryAfter"], 45);

        // Another client still has its full allowance
        call(&server, "198.51.100.2").await.assert_status_ok();
    }
}
