// Domain Layer - Queues, messages and their invariants

pub mod error;
pub mod message;
pub mod queue;

// Re-exports
pub use error::DomainError;
pub use message::{Message, MessageId};
pub use queue::{QueueName, QueueStats, MAX_QUEUE_NAME_LEN};
