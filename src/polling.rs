use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::POLL_INTERVAL_MS;

/// Fixed-interval poll loop with a deadline computed once at construction.
///
/// Callers scan first and only then ask the poller whether to continue, so a
/// zero timeout still performs exactly one scan.
#[derive(Debug)]
pub struct Poller {
    deadline: Instant,
    interval: Duration,
    intervals: u32,
}

impl Poller {
    pub fn new(timeout: Duration) -> Self {
        Self::with_interval(timeout, Duration::from_millis(POLL_INTERVAL_MS))
    }

    pub fn with_interval(timeout: Duration, interval: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
            interval,
            intervals: 0,
        }
    }

    /// Sleeps one interval and returns `true`, or returns `false` once the
    /// deadline has passed.
    pub async fn next_scan(&mut self) -> bool {
        if Instant::now() >= self.deadline {
            return false;
        }
        tokio::time::sleep(self.interval).await;
        self.intervals += 1;
        true
    }

    /// Number of intervals slept so far. The scan count is one more.
    pub fn intervals(&self) -> u32 {
        self.intervals
    }
}

/// Repeats `check` until it yields a value or `timeout` elapses.
///
/// Errors from `check` abort the loop immediately.
pub async fn poll_until<T, E, F, Fut>(timeout: Duration, mut check: F) -> Result<Option<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let mut poller = Poller::new(timeout);
    loop {
        if let Some(value) = check().await? {
            return Ok(Some(value));
        }

        if !poller.next_scan().await {
            return Ok(None);
        }
    }
}
