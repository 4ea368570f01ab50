//! Bounded polling of remote asynchronous jobs.
//!
//! A poll runs until the fetched value satisfies a terminal predicate or the
//! wall-clock deadline passes. Fetch errors are transient: they are logged
//! and retried after the same interval, bounded only by the deadline.
//!
//! Time comes from `tokio::time`, so tests can drive the loop with a paused
//! clock instead of real sleeps.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::warn;

/// Interval and deadline for a polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollPolicy {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

/// How a polling loop ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    /// A terminal value was observed after `attempts` fetches.
    Finished { value: T, attempts: u32 },
    /// The deadline passed before a terminal value was seen.
    TimedOut { attempts: u32, elapsed: Duration },
}

/// Poll `fetch` until `is_terminal` holds or `policy.timeout` elapses.
///
/// The deadline is checked before each fetch, so a loop never starts a new
/// fetch once the timeout has passed; it may overshoot by at most one
/// interval plus one fetch.
pub async fn poll_until<T, E, F, Fut, P>(policy: &PollPolicy, mut fetch: F, is_terminal: P) -> PollOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&T) -> bool,
{
    let start = Instant::now();
    let mut attempts = 0u32;

    while start.elapsed() < policy.timeout {
        attempts += 1;
        match fetch().await {
            Ok(value) if is_terminal(&value) => return PollOutcome::Finished { value, attempts },
            Ok(_) => {}
            Err(e) => {
                warn!(attempt = attempts, "Poll fetch failed, retrying: {}", e);
            }
        }
        tokio::time::sleep(policy.interval).await;
    }

    PollOutcome::TimedOut {
        attempts,
        elapsed: start.elapsed(),
    }
}
