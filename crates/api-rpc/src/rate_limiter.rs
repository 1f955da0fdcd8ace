//! Rate Limiter (Token Bucket Algorithm)
//!
//! Caps how fast RPC clients can push payloads into the broker.

use std::sync::{Mutex, PoisonError};
use tokio::time::Instant;

/// Token bucket shared by every RPC connection
pub struct RateLimiter {
    bucket: Mutex<Bucket>,
    max_tokens: f64,
    refill_per_sec: f64,
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// # Arguments
    /// * `max_tokens` - Maximum burst size
    /// * `refill_rate` - Tokens added per second
    ///
    /// # Example
    /// Allow 100 requests/sec with burst of 200:
    /// `RateLimiter::new(200, 100)`
    pub fn new(max_tokens: u32, refill_rate: u32) -> Self {
        Self {
            bucket: Mutex::new(Bucket {
                tokens: max_tokens as f64,
                last_refill: Instant::now(),
            }),
            max_tokens: max_tokens as f64,
            refill_per_sec: refill_rate as f64,
        }
    }

    /// Consume one token if available
    ///
    /// Returns true if allowed, false if rate limited
    pub fn check(&self) -> bool {
        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        self.refill(&mut bucket);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn refill(&self, bucket: &mut Bucket) {
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.max_tokens);
        bucket.last_refill = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::{advance, Duration};

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_allows_within_limit() {
        let limiter = RateLimiter::new(10, 10);

        // Should allow 10 requests
        for _ in 0..10 {
            assert!(limiter.check());
        }

        // 11th should be denied
        assert!(!limiter.check());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_refills() {
        let limiter = RateLimiter::new(5, 10); // 10 tokens/sec

        for _ in 0..5 {
            assert!(limiter.check());
        }
        assert!(!limiter.check());

        advance(Duration::from_millis(200)).await;
        assert!(limiter.check());
        assert!(limiter.check());
        assert!(!limiter.check());

        // Refill never exceeds the burst size
        advance(Duration::from_secs(10)).await;
        for _ in 0..5 {
            assert!(limiter.check());
        }
        assert!(!limiter.check());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_rate_limiter_concurrent() {
        let limiter = Arc::new(RateLimiter::new(100, 1));

        let mut handles = vec![];
        for _ in 0..10 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                (0..20).filter(|_| limiter.check()).count()
            }));
        }

        let mut total_allowed = 0;
        for handle in handles {
            total_allowed += handle.await.unwrap();
        }

        // 200 attempts against a burst of 100 and a trickle refill
        assert!(
            (100..=102).contains(&total_allowed),
            "Expected about 100 allowed, got {}",
            total_allowed
        );
    }
}
