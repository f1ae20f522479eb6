use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::error::{Result, ScanError};

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket shared by every probe unit of a scan.
///
/// `acquire` never fails: it suspends the caller until a token is available.
/// The whole refill/debit cycle, including the wait on a deficit, runs under one
/// lock so concurrent callers are serialized and never double-spend.
pub struct RateLimiter {
    rate: f64,
    capacity: f64,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    pub fn new(rate_per_second: f64, burst: u32) -> Result<Self> {
        if !rate_per_second.is_finite() || rate_per_second <= 0.0 {
            return Err(ScanError::InvalidParameter(format!(
                "rate_per_second must be > 0, got {rate_per_second}"
            )));
        }
        // the longest wait is one full token interval; it has to fit in a Duration
        if Duration::try_from_secs_f64(1.0 / rate_per_second).is_err() {
            return Err(ScanError::InvalidParameter(format!(
                "rate_per_second {rate_per_second} is too small to schedule"
            )));
        }
        let capacity = f64::from(burst.max(1));
        Ok(Self {
            rate: rate_per_second,
            capacity,
            bucket: Mutex::new(Bucket { tokens: capacity, last_refill: Instant::now() }),
        })
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    fn refill(&self, bucket: &mut Bucket) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
        bucket.last_refill = now;
        bucket.tokens = (bucket.tokens + elapsed * self.rate).min(self.capacity);
    }

    pub async fn acquire(&self) {
        let mut bucket = self.bucket.lock().await;
        self.refill(&mut bucket);
        if bucket.tokens < 1.0 {
            let deficit = 1.0 - bucket.tokens;
            sleep(Duration::try_from_secs_f64(deficit / self.rate).unwrap_or(Duration::MAX)).await;
            // the slept interval produced exactly the missing token, which is spent now
            bucket.tokens = 0.0;
            bucket.last_refill = Instant::now();
        } else {
            bucket.tokens -= 1.0;
        }
    }

    /// Current token count after applying refill. Does not consume.
    pub async fn available_tokens(&self) -> f64 {
        let mut bucket = self.bucket.lock().await;
        self.refill(&mut bucket);
        bucket.tokens
    }
}
