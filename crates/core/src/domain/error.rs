// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Queue name must not be empty")]
    EmptyQueueName,

    #[error("Queue name too long: {len} bytes (max {max})")]
    QueueNameTooLong { len: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, DomainError>;
