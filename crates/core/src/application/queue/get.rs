// Get Use Case

use crate::application::shutdown::ShutdownToken;
use crate::domain::{Message, QueueName};
use crate::error::Result;
use crate::port::QueueStore;
use std::time::{Duration, Instant};
use tracing::debug;

/// Get request (raw, as received from a transport)
#[derive(Debug, Clone)]
pub struct GetRequest {
    pub queue: String,
    /// How long to wait for a payload; zero checks once
    pub timeout: Duration,
}

impl GetRequest {
    pub fn new(queue: impl Into<String>, timeout: Duration) -> Self {
        Self {
            queue: queue.into(),
            timeout,
        }
    }
}

/// Convert a caller-supplied timeout in whole seconds into a wait budget
///
/// Negative values mean "do not wait", the same as zero.
pub fn wait_budget(timeout_secs: i64) -> Duration {
    Duration::from_secs(timeout_secs.max(0) as u64)
}

/// Execute get use case
///
/// Returns `Ok(None)` when the queue stayed empty for the whole budget or the
/// wait was cancelled.
pub async fn execute(
    store: &dyn QueueStore,
    req: GetRequest,
    cancel: Option<ShutdownToken>,
) -> Result<Option<Message>> {
    let queue = QueueName::parse(req.queue)?;
    let started = Instant::now();

    let message = store.get(&queue, req.timeout, cancel).await?;

    debug!(
        queue = %queue,
        found = message.is_some(),
        timeout_secs = req.timeout.as_secs(),
        waited_ms = started.elapsed().as_millis() as u64,
        "Dequeue finished"
    );

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_budget_clamps_negative_to_zero() {
        assert_eq!(wait_budget(-5), Duration::ZERO);
        assert_eq!(wait_budget(0), Duration::ZERO);
        assert_eq!(wait_budget(3), Duration::from_secs(3));
    }
}
