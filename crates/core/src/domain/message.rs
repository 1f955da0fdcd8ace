// Message Domain Model

use serde::{Deserialize, Serialize};

/// Message ID (UUID v4 in production)
pub type MessageId = String;

/// A payload sitting in a queue
///
/// The payload is opaque: the broker never inspects it, and the empty string
/// is a valid payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub payload: String,
    pub enqueued_at: i64, // epoch ms
}

impl Message {
    /// Create a message with injected ID and timestamp
    pub fn new(id: impl Into<String>, payload: impl Into<String>, enqueued_at: i64) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
            enqueued_at,
        }
    }

    /// Create a test message with deterministic ID and timestamp (for tests only)
    ///
    /// IDs are `msg-1`, `msg-2`, ... and timestamps step by 1000.
    pub fn new_test(payload: impl Into<String>) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        Self::new(format!("msg-{}", counter), payload, (counter * 1000) as i64)
    }

    pub fn into_payload(self) -> String {
        self.payload
    }
}
