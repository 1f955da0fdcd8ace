// Queue Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest queue name accepted, in bytes
pub const MAX_QUEUE_NAME_LEN: usize = 256;

/// Validated queue identifier
///
/// Any non-empty string up to [`MAX_QUEUE_NAME_LEN`] bytes is a valid name.
/// Names are opaque: `orders`, `orders/eu` and `Orders` are three different
/// queues.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QueueName(String);

impl QueueName {
    pub fn parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::EmptyQueueName);
        }
        if name.len() > MAX_QUEUE_NAME_LEN {
            return Err(DomainError::QueueNameTooLong {
                len: name.len(),
                max: MAX_QUEUE_NAME_LEN,
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for QueueName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<QueueName> for String {
    fn from(name: QueueName) -> Self {
        name.0
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Point-in-time snapshot of a single queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub name: QueueName,
    /// Payloads currently pending
    pub depth: usize,
    pub enqueued_total: u64,
    pub dequeued_total: u64,
    /// Consumers currently suspended in a blocking get
    pub waiting_consumers: usize,
    /// Enqueue time (epoch ms) of the head payload, if any
    pub oldest_enqueued_at: Option<i64>,
}
