// Queue Store Port (Interface)

use crate::application::shutdown::ShutdownToken;
use crate::domain::{Message, QueueName, QueueStats};
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Named FIFO queues with blocking dequeue
///
/// Implementations must deliver every stored message to exactly one `get`,
/// in insertion order per queue. Queues spring into existence on first
/// reference and are never removed.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Append a message to the tail of `queue` and wake its waiting consumers.
    ///
    /// Returns the queue depth right after the append.
    async fn put(&self, queue: &QueueName, message: Message) -> Result<usize>;

    /// Remove the head of `queue`, waiting up to `timeout` for one to arrive.
    ///
    /// `Duration::ZERO` checks once and returns. `Ok(None)` means nothing was
    /// available before the deadline, or `cancel` fired while waiting.
    async fn get(
        &self,
        queue: &QueueName,
        timeout: Duration,
        cancel: Option<ShutdownToken>,
    ) -> Result<Option<Message>>;

    /// All queue names referenced so far, sorted
    async fn list_queues(&self) -> Result<Vec<QueueName>>;

    /// Per-queue snapshot, sorted by name
    async fn stats(&self) -> Result<Vec<QueueStats>>;
}
