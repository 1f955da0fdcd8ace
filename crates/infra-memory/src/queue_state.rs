// Per-queue state held inside the registry lock

use lineup_core::domain::{Message, QueueName, QueueStats};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;

/// One named FIFO channel
///
/// Every field is read and written only while the registry lock is held.
/// `waiters` is cloned out so consumers can await it with the lock released.
pub(crate) struct QueueState {
    items: VecDeque<Message>,
    waiters: Arc<Notify>,
    enqueued_total: u64,
    dequeued_total: u64,
    waiting: usize,
}

impl QueueState {
    pub(crate) fn new() -> Self {
        Self {
            items: VecDeque::new(),
            waiters: Arc::new(Notify::new()),
            enqueued_total: 0,
            dequeued_total: 0,
            waiting: 0,
        }
    }

    /// Append to the tail and wake every consumer waiting on this queue.
    ///
    /// Waiters race for the new item; the ones that lose go back to waiting.
    pub(crate) fn push(&mut self, message: Message) -> usize {
        self.items.push_back(message);
        self.enqueued_total += 1;
        self.waiters.notify_waiters();
        self.items.len()
    }

    pub(crate) fn pop(&mut self) -> Option<Message> {
        let message = self.items.pop_front()?;
        self.dequeued_total += 1;
        Some(message)
    }

    pub(crate) fn waiters(&self) -> Arc<Notify> {
        Arc::clone(&self.waiters)
    }

    pub(crate) fn add_waiter(&mut self) {
        self.waiting += 1;
    }

    pub(crate) fn remove_waiter(&mut self) {
        self.waiting = self.waiting.saturating_sub(1);
    }

    pub(crate) fn snapshot(&self, name: &QueueName) -> QueueStats {
        QueueStats {
            name: name.clone(),
            depth: self.items.len(),
            enqueued_total: self.enqueued_total,
            dequeued_total: self.dequeued_total,
            waiting_consumers: self.waiting,
            oldest_enqueued_at: self.items.front().map(|m| m.enqueued_at),
        }
    }
}
