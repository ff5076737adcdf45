//! Process-wide gate on model calls.
//!
//! One limiter instance is shared by every agent runner across all active
//! reviews. Callers that hit the ceiling queue until the window rolls over;
//! a request is never dropped or failed for contention.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Fixed-window rate limiter bounding calls per unit time.
///
/// Holds no review-specific state; inject it as an `Arc` wherever model
/// calls happen.
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    state: Mutex<Window>,
}

struct Window {
    started: Instant,
    issued: u32,
}

impl RateLimiter {
    /// Limiter allowing `requests_per_minute` calls per 60s window.
    pub fn new(requests_per_minute: u32) -> Self {
        Self::with_window(requests_per_minute, Duration::from_secs(60))
    }

    /// Limiter with an explicit window, for tests with injectable limits.
    pub fn with_window(limit: u32, window: Duration) -> Self {
        Self {
            limit: limit.max(1),
            window,
            state: Mutex::new(Window {
                started: Instant::now(),
                issued: 0,
            }),
        }
    }

    /// Wait until a slot is available in the current window, then take it.
    ///
    /// This is a suspension point: cancellation-aware callers race the
    /// returned future against their cancellation token.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut window = self.state.lock().await;
                let now = Instant::now();
                if now.duration_since(window.started) >= self.window {
                    window.started = now;
                    window.issued = 0;
                }
                if window.issued < self.limit {
                    window.issued += 1;
                    return;
                }
                self.window - now.duration_since(window.started)
            };
            debug!(wait_ms = wait.as_millis() as u64, "Rate limit reached, waiting for next window");
            tokio::time::sleep(wait).await;
        }
    }
}
