//! Rate Limiting Infrastructure
//!
//! Fixed-window in-memory rate limiting keyed by client IP. Counters
//! live in process memory, so limits are per instance; this is not a
//! distributed rate limiter.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::moderate()
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    /// 5 requests per minute (auth endpoints)
    pub fn strict() -> Self {
        Self::new(5, 60)
    }

    /// 20 requests per minute (write endpoints)
    pub fn moderate() -> Self {
        Self::new(20, 60)
    }

    /// 100 requests per minute (read endpoints)
    pub fn relaxed() -> Self {
        Self::new(100, 60)
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub retry_after_secs: u64,
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Check and increment the counter for a key
    async fn check_and_increment(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult;
}

/// window start + request count for one key
#[derive(Debug, Clone, Copy)]
struct WindowState {
    started_at: Instant,
    count: u32,
}

/// In-memory fixed-window rate limiter
#[derive(Debug, Default)]
pub struct MemoryRateLimiter {
    windows: Mutex<HashMap<String, WindowState>>,
}

impl MemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check and increment the counter for a key
    pub fn check(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult {
        self.check_at(key, config, Instant::now())
    }

    fn check_at(&self, key: &str, config: &RateLimitConfig, now: Instant) -> RateLimitResult {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        let state = windows.entry(key.to_string()).or_insert(WindowState {
            started_at: now,
            count: 0,
        });

        // Fixed window: counter resets when the window elapses
        if now.duration_since(state.started_at) >= config.window {
            state.started_at = now;
            state.count = 0;
        }

        if state.count >= config.max_requests {
            let elapsed = now.duration_since(state.started_at);
            let retry_after = config.window.saturating_sub(elapsed);
            return RateLimitResult {
                allowed: false,
                remaining: 0,
                retry_after_secs: retry_after.as_secs().max(1),
            };
        }

        state.count += 1;
        RateLimitResult {
            allowed: true,
            remaining: config.max_requests - state.count,
            retry_after_secs: 0,
        }
    }

    /// Drop windows that expired more than one window ago
    pub fn prune(&self, config: &RateLimitConfig) {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        windows.retain(|_, state| now.duration_since(state.started_at) < config.window * 2);
    }
}

impl RateLimitStore for MemoryRateLimiter {
    async fn check_and_increment(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult {
        self.check(key, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = MemoryRateLimiter::new();
        let config = RateLimitConfig::new(3, 60);

        for i in 0..3 {
            let result = limiter.check("1.2.3.4", &config);
            assert!(result.allowed, "request {} should be allowed", i);
            assert_eq!(result.remaining, 2 - i);
        }

        let result = limiter.check("1.2.3.4", &config);
        assert!(!result.allowed);
        assert_eq!(result.remaining, 0);
        assert!(result.retry_after_secs >= 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = MemoryRateLimiter::new();
        let config = RateLimitConfig::new(1, 60);

        assert!(limiter.check("1.1.1.1", &config).allowed);
        assert!(!limiter.check("1.1.1.1", &config).allowed);
        assert!(limiter.check("2.2.2.2", &config).allowed);
    }

    #[test]
    fn test_window_resets() {
        let limiter = MemoryRateLimiter::new();
        let config = RateLimitConfig::new(1, 60);

        let start = Instant::now();
        assert!(limiter.check_at("1.2.3.4", &config, start).allowed);
        assert!(!limiter.check_at("1.2.3.4", &config, start).allowed);

        // Same window, still blocked
        let later = start + Duration::from_secs(30);
        assert!(!limiter.check_at("1.2.3.4", &config, later).allowed);

        // Next window, counter reset
        let next_window = start + Duration::from_secs(61);
        assert!(limiter.check_at("1.2.3.4", &config, next_window).allowed);
    }

    #[test]
    fn test_presets() {
        assert_eq!(RateLimitConfig::strict().max_requests, 5);
        assert_eq!(RateLimitConfig::moderate().max_requests, 20);
        assert_eq!(RateLimitConfig::relaxed().max_requests, 100);
    }
}
