// ── Bounded, cancellable waits ──
//
// An attempt is polled at a fixed interval until it yields a value, the
// overall timeout elapses, or the cancellation token fires. The value is
// handed back to the caller as the result of the wait; nothing is shared.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Interval and overall bound of a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollPolicy {
    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_secs(10))
    }
}

/// How a wait ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    Ready(T),
    TimedOut,
    Cancelled,
}

/// Poll `attempt` every `policy.interval` until it returns `Some`.
///
/// The first attempt runs immediately. An attempt still in flight when the
/// timeout elapses or `cancel` fires is dropped.
pub async fn poll_until<T, F, Fut>(
    policy: PollPolicy,
    cancel: &CancellationToken,
    mut attempt: F,
) -> WaitOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let attempts = async {
        loop {
            if let Some(value) = attempt().await {
                return value;
            }
            trace!(interval = ?policy.interval, "not ready, sleeping");
            tokio::time::sleep(policy.interval).await;
        }
    };

    tokio::select! {
        biased;
        () = cancel.cancelled() => WaitOutcome::Cancelled,
        result = tokio::time::timeout(policy.timeout, attempts) => match result {
            Ok(value) => WaitOutcome::Ready(value),
            Err(_) => WaitOutcome::TimedOut,
        },
    }
}
