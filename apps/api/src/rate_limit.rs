//! Fixed-window request limiter applied to everything under `/api`.
//!
//! One global window rather than per-client buckets: the limiter guards the
//! whole process against upload/analyze floods, and the window resets after
//! `RATE_LIMIT_WINDOW_MS`.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub struct FixedWindowLimiter {
    // (window start, requests seen in this window)
    state: Mutex<(Instant, u32)>,
    window: Duration,
    max_requests: u32,
}

impl FixedWindowLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            state: Mutex::new((Instant::now(), 0)),
            window,
            max_requests,
        }
    }

    /// Records one request; returns false when the current window is full.
    pub fn check(&self) -> bool {
        let mut guard = self.state.lock().unwrap();
        let (window_start, count) = *guard;
        let now = Instant::now();

        if now.duration_since(window_start) >= self.window {
            *guard = (now, 1);
            return true;
        }

        if count < self.max_requests {
            *guard = (window_start, count + 1);
            true
        } else {
            false
        }
    }
}

pub async fn rate_limit_middleware(
    State(state): State<crate::state::AppState>,
    req: Request,
    next: Next,
) -> Response {
    if !state.rate_limiter.check() {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "status": "fail",
                "message": "Too many requests from this IP. Please try again later.",
            })),
        )
            .into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_within_window_are_limited() {
        let limiter = FixedWindowLimiter::new(Duration::from_secs(60), 3);
        assert!(limiter.check());
        assert!(limiter.check());
        assert!(limiter.check());
        assert!(!limiter.check());
        assert!(!limiter.check());
    }

    #[test]
    fn test_window_expiry_resets_count() {
        let limiter = FixedWindowLimiter::new(Duration::from_millis(10), 1);
        assert!(limiter.check());
        assert!(!limiter.check());
        std::thread::sleep(Duration::from_millis(15));
        assert!(limiter.check());
    }
}
