use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::Error;

/// Window of the general `/api` limit.
pub const API_WINDOW: Duration = Duration::from_secs(15 * 60);
/// Window of the application submission limit.
pub const SUBMISSION_WINDOW: Duration = Duration::from_secs(60 * 60);

#[derive(Debug)]
struct WindowState {
    start: Instant,
    count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
}

/// Fixed-window counter per client key.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    message: &'static str,
    clients: Arc<Mutex<HashMap<String, WindowState>>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration, message: &'static str) -> Self {
        Self {
            limit: limit.max(1),
            window,
            message,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 1000 requests per 15 minutes unless configured otherwise.
    pub fn api(limit: u32) -> Self {
        Self::new(
            limit,
            API_WINDOW,
            "Too many requests from this IP, please try again later.",
        )
    }

    pub fn submissions(limit: u32) -> Self {
        Self::new(
            limit,
            SUBMISSION_WINDOW,
            "Too many application submissions, please try again later.",
        )
    }

    pub fn check(&self, key: &str) -> Decision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Decision {
        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());

        // Drop expired windows once the map starts to grow.
        if clients.len() >= 1024 {
            let window = self.window;
            clients.retain(|_, state| now.duration_since(state.start) < window);
        }

        let state = clients.entry(key.to_string()).or_insert(WindowState {
            start: now,
            count: 0,
        });
        if now.duration_since(state.start) >= self.window {
            state.start = now;
            state.count = 0;
        }

        let allowed = state.count < self.limit;
        if allowed {
            state.count += 1;
        }
        Decision {
            allowed,
            limit: self.limit,
            remaining: self.limit - state.count.min(self.limit),
            reset_after: self.window.saturating_sub(now.duration_since(state.start)),
        }
    }
}

/// Peer address when the server exposes it, else the first `X-Forwarded-For` hop.
pub fn client_key(req: &Request<Body>) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    forwarded_for(req.headers()).unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Headers already set by an inner, narrower limiter are kept.
fn set_headers(headers: &mut HeaderMap, decision: &Decision) {
    if headers.contains_key("ratelimit-limit") {
        return;
    }
    let values = [
        ("ratelimit-limit", decision.limit as u64),
        ("ratelimit-remaining", decision.remaining as u64),
        ("ratelimit-reset", decision.reset_after.as_secs()),
    ];
    for (name, value) in values {
        headers.insert(name, HeaderValue::from(value));
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(&req);
    let decision = limiter.check(&key);
    if !decision.allowed {
        tracing::warn!(client = %key, "rate limit exceeded");
        let mut response = Error::TooManyRequests(limiter.message.to_string()).into_response();
        set_headers(response.headers_mut(), &decision);
        return response;
    }
    let mut response = next.run(req).await;
    set_headers(response.headers_mut(), &decision);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_each_client_separately() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60), "slow down");
        let now = Instant::now();
        assert!(limiter.check_at("1.1.1.1", now).allowed);
        let second = limiter.check_at("1.1.1.1", now);
        assert!(second.allowed);
        assert_eq!(second.remaining, 0);
        assert!(!limiter.check_at("1.1.1.1", now).allowed);
        assert!(limiter.check_at("2.2.2.2", now).allowed);
    }

    #[test]
    fn window_resets_after_it_elapses() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60), "slow down");
        let now = Instant::now();
        assert!(limiter.check_at("ip", now).allowed);
        assert!(!limiter.check_at("ip", now + Duration::from_secs(30)).allowed);
        assert!(limiter.check_at("ip", now + Duration::from_secs(61)).allowed);
    }

    #[test]
    fn forwarded_for_uses_first_hop() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&req), "203.0.113.9");

        let bare = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&bare), "unknown");
    }
}
