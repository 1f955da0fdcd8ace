// In-Memory QueueStore Implementation

use crate::queue_state::QueueState;
use async_trait::async_trait;
use lineup_core::application::ShutdownToken;
use lineup_core::domain::{Message, QueueName, QueueStats};
use lineup_core::error::Result;
use lineup_core::port::QueueStore;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::{debug, trace};

/// Deadline used when `now + timeout` does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

type Queues = HashMap<QueueName, QueueState>;

/// Process-wide queue registry
///
/// A single lock guards the name map and every queue's contents. Hold times
/// are a map lookup plus a deque push/pop, and no `.await` ever happens with
/// the lock held, so a blocking consumer never stalls other queues.
pub struct InMemoryQueueStore {
    queues: Mutex<Queues>,
}

impl InMemoryQueueStore {
    pub fn new() -> Self {
        Self {
            queues: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Queues> {
        // No code path panics while holding the lock; recover the map regardless
        self.queues.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `message` to `queue`, creating the queue on first reference
    pub fn push(&self, queue: &QueueName, message: Message) -> usize {
        let mut queues = self.lock();
        ensure_queue(&mut queues, queue).push(message)
    }

    /// Blocking dequeue with deadline and optional cancellation
    pub async fn take(
        &self,
        queue: &QueueName,
        timeout: Duration,
        mut cancel: Option<ShutdownToken>,
    ) -> Option<Message> {
        let deadline = deadline_after(timeout);

        let waiters = {
            let mut queues = self.lock();
            let state = ensure_queue(&mut queues, queue);
            if let Some(message) = state.pop() {
                return Some(message);
            }
            if timeout.is_zero() {
                return None;
            }
            state.add_waiter();
            state.waiters()
        };
        let _waiting = WaitingGuard { store: self, queue };

        loop {
            // Register interest before re-checking: a push landing between the
            // check and the await below still wakes this future.
            let notified = waiters.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(message) = self.try_pop(queue) {
                return Some(message);
            }
            if Instant::now() >= deadline {
                trace!(queue = %queue, "Dequeue deadline passed");
                return None;
            }

            tokio::select! {
                _ = &mut notified => {}
                _ = time::sleep_until(deadline) => {}
                _ = cancelled(&mut cancel) => {
                    debug!(queue = %queue, "Dequeue cancelled while waiting");
                    return None;
                }
            }
        }
    }

    fn try_pop(&self, queue: &QueueName) -> Option<Message> {
        let mut queues = self.lock();
        queues.get_mut(queue).and_then(QueueState::pop)
    }

    pub fn queue_names(&self) -> Vec<QueueName> {
        let mut names: Vec<QueueName> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn snapshot(&self) -> Vec<QueueStats> {
        let mut stats: Vec<QueueStats> = self
            .lock()
            .iter()
            .map(|(name, state)| state.snapshot(name))
            .collect();
        stats.sort_by(|a, b| a.name.cmp(&b.name));
        stats
    }
}

impl Default for InMemoryQueueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueueStore for InMemoryQueueStore {
    async fn put(&self, queue: &QueueName, message: Message) -> Result<usize> {
        Ok(self.push(queue, message))
    }

    async fn get(
        &self,
        queue: &QueueName,
        timeout: Duration,
        cancel: Option<ShutdownToken>,
    ) -> Result<Option<Message>> {
        Ok(self.take(queue, timeout, cancel).await)
    }

    async fn list_queues(&self) -> Result<Vec<QueueName>> {
        Ok(self.queue_names())
    }

    async fn stats(&self) -> Result<Vec<QueueStats>> {
        Ok(self.snapshot())
    }
}

/// Look up `name`, registering an empty queue if this is its first reference
fn ensure_queue<'a>(queues: &'a mut Queues, name: &QueueName) -> &'a mut QueueState {
    queues.entry(name.clone()).or_insert_with(|| {
        debug!(queue = %name, "Queue created");
        QueueState::new()
    })
}

fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or(now + FAR_FUTURE)
}

async fn cancelled(cancel: &mut Option<ShutdownToken>) {
    match cancel {
        Some(token) => token.wait().await,
        None => std::future::pending().await,
    }
}

/// Keeps the waiting-consumer count honest even when the get future is dropped
struct WaitingGuard<'a> {
    store: &'a InMemoryQueueStore,
    queue: &'a QueueName,
}

impl Drop for WaitingGuard<'_> {
    fn drop(&mut self) {
        if let Some(state) = self.store.lock().get_mut(self.queue) {
            state.remove_waiter();
        }
    }
}
