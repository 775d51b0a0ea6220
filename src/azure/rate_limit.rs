use crate::error::FetchError;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket shared by every fetch task. Waiting for a token suspends only the
/// caller; the lock is never held across a sleep.
#[derive(Debug)]
pub struct RateLimiter {
    refill_per_sec: f64,
    capacity: f64,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    pub fn new(requests_per_second: f64, burst_size: u32) -> Self {
        let capacity = f64::from(burst_size.max(1));
        Self {
            refill_per_sec: requests_per_second,
            capacity,
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Takes one token, waiting for the bucket to refill if needed. Fails without
    /// waiting when the token would only become available after `deadline`.
    pub async fn acquire(&self, deadline: Instant) -> Result<(), FetchError> {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                let now = Instant::now();
                self.refill(&mut bucket, now);

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return Ok(());
                }

                let missing = 1.0 - bucket.tokens;
                // A wait too long to represent can never fit before the deadline
                let ready_at = Duration::try_from_secs_f64(missing / self.refill_per_sec)
                    .ok()
                    .and_then(|wait| now.checked_add(wait).map(|at| (wait, at)));
                match ready_at {
                    Some((wait, at)) if at <= deadline => wait,
                    _ => {
                        tracing::debug!("rate limiter wait would exceed deadline");
                        return Err(FetchError::RateLimitExceeded);
                    }
                }
            };

            tracing::trace!(?wait, "waiting for rate limiter token");
            tokio::time::sleep(wait).await;
        }
    }

    /// Tokens currently available, after refilling.
    pub async fn available(&self) -> f64 {
        let mut bucket = self.bucket.lock().await;
        self.refill(&mut bucket, Instant::now());
        bucket.tokens
    }

    fn refill(&self, bucket: &mut Bucket, now: Instant) {
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.last_refill = now;
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(60)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_is_available_immediately() {
        let limiter = RateLimiter::new(1.0, 3);
        let start = Instant::now();

        for _ in 0..3 {
            assert_ok!(limiter.acquire(far_deadline()).await);
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_refill_after_burst() {
        let limiter = RateLimiter::new(2.0, 1);
        assert_ok!(limiter.acquire(far_deadline()).await);

        let start = Instant::now();
        assert_ok!(limiter.acquire(far_deadline()).await);

        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_bucket_past_deadline_fails() {
        let limiter = RateLimiter::new(0.5, 1);
        assert_ok!(limiter.acquire(far_deadline()).await);

        let deadline = Instant::now() + Duration::from_millis(100);
        let err = assert_err!(limiter.acquire(deadline).await);
        assert_eq!(err, FetchError::RateLimitExceeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_vanishing_refill_rate_fails_instead_of_overflowing() {
        let limiter = RateLimiter::new(1e-30, 1);
        let deadline = Instant::now() + Duration::from_secs(30);
        assert_ok!(limiter.acquire(deadline).await);

        let err = assert_err!(limiter.acquire(deadline).await);
        assert_eq!(err, FetchError::RateLimitExceeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refill_is_capped_at_burst() {
        let limiter = RateLimiter::new(10.0, 2);
        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(limiter.available().await, 2.0);
    }
}
