//! Token-bucket rate limiter for Riot API requests.
//!
//! Development keys allow 20 req/s and 100 req/2 min, so the default of 18
//! calls per second leaves headroom. Burst capacity equals the per-second
//! rate. Callers that find the bucket empty queue up and are released in
//! arrival order by a single drain task that sleeps until the next token is
//! due.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex};
use tokio::time::{sleep, Instant};
use tracing::trace;

/// Shared token bucket. Cloning yields another handle to the same bucket.
///
/// A handle may outlive the runtime it was first used on. If that runtime
/// shuts down while callers are queued, the next caller restarts draining.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    max_tokens: f64,
    refill_per_ms: f64,
    bucket: Mutex<Bucket>,
    /// A drain task is scheduled. Only set or cleared with `bucket` locked.
    draining: AtomicBool,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
    waiters: VecDeque<oneshot::Sender<()>>,
}

impl Inner {
    fn refill(&self, bucket: &mut Bucket) {
        let now = Instant::now();
        // Whole nanoseconds keep `1000 / N` ms worth of refill at exactly one token.
        let elapsed_ns = now.duration_since(bucket.last_refill).as_nanos() as f64;
        bucket.tokens = (bucket.tokens + elapsed_ns * self.refill_per_ms / 1_000_000.0)
            .min(self.max_tokens);
        bucket.last_refill = now;
    }

    /// Time until one whole token has accumulated.
    fn time_to_next_token(&self, tokens: f64) -> Duration {
        let missing = (1.0 - tokens).max(0.0);
        Duration::from_millis((missing / self.refill_per_ms).ceil() as u64)
    }
}

impl RateLimiter {
    /// Default calls per second.
    pub const DEFAULT_PER_SECOND: u32 = 18;

    /// Create a full bucket allowing `per_second` calls per second.
    pub fn new(per_second: u32) -> Self {
        let max_tokens = f64::from(per_second.max(1));
        Self {
            inner: Arc::new(Inner {
                max_tokens,
                refill_per_ms: max_tokens / 1000.0,
                bucket: Mutex::new(Bucket {
                    tokens: max_tokens,
                    last_refill: Instant::now(),
                    waiters: VecDeque::new(),
                }),
                draining: AtomicBool::new(false),
            }),
        }
    }

    /// Wait until a token is available, then consume it.
    ///
    /// Resolves without suspending when a token is free and nobody is queued.
    pub async fn acquire(&self) {
        let granted = {
            let mut bucket = self.inner.bucket.lock().await;
            self.inner.refill(&mut bucket);

            if bucket.waiters.is_empty() && bucket.tokens >= 1.0 {
                bucket.tokens -= 1.0;
                return;
            }

            let (tx, rx) = oneshot::channel();
            bucket.waiters.push_back(tx);
            trace!("Rate limiter queue depth {}", bucket.waiters.len());

            if !self.inner.draining.swap(true, Ordering::AcqRel) {
                tokio::spawn(drain(DrainGuard {
                    inner: Arc::clone(&self.inner),
                    finished: false,
                }));
            }
            rx
        };

        // The drain task only drops a sender after sending on it.
        let _ = granted.await;
    }

    /// Current token count after refilling.
    pub async fn available_tokens(&self) -> f64 {
        let mut bucket = self.inner.bucket.lock().await;
        self.inner.refill(&mut bucket);
        bucket.tokens
    }

    /// Number of callers waiting for a token.
    pub async fn queued(&self) -> usize {
        self.inner.bucket.lock().await.waiters.len()
    }

    pub fn max_tokens(&self) -> f64 {
        self.inner.max_tokens
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PER_SECOND)
    }
}

/// Clears `draining` if the drain task is dropped before the queue empties,
/// e.g. when its runtime shuts down.
struct DrainGuard {
    inner: Arc<Inner>,
    finished: bool,
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.inner.draining.store(false, Ordering::Release);
        }
    }
}

/// Release queued callers as tokens accrue. Exits once the queue is empty.
async fn drain(mut guard: DrainGuard) {
    loop {
        let inner = &guard.inner;
        let wait = {
            let mut bucket = inner.bucket.lock().await;
            inner.refill(&mut bucket);

            loop {
                if bucket.waiters.is_empty() {
                    inner.draining.store(false, Ordering::Release);
                    drop(bucket);
                    guard.finished = true;
                    return;
                }
                if bucket.tokens < 1.0 {
                    break;
                }
                bucket.tokens -= 1.0;
                if let Some(waiter) = bucket.waiters.pop_front() {
                    // Caller went away while queued; its token goes back.
                    if waiter.send(()).is_err() {
                        bucket.tokens += 1.0;
                    }
                }
            }

            inner.time_to_next_token(bucket.tokens)
        };

        sleep(wait).await;
    }
}
