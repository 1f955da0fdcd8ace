// Put Use Case

use super::QueueLimits;
use crate::domain::{Message, MessageId, QueueName};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, QueueStore, TimeProvider};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Put request (raw, as received from a transport)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutRequest {
    pub queue: String,
    pub value: String,
}

/// What the broker recorded for an accepted put
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutReceipt {
    pub queue: QueueName,
    pub message_id: MessageId,
    /// Queue depth right after the append
    pub depth: usize,
}

/// Validate a put request against the broker limits
pub fn validate_request(req: &PutRequest, limits: &QueueLimits) -> Result<QueueName> {
    let queue = QueueName::parse(req.queue.as_str())?;

    if req.value.len() > limits.max_payload_bytes {
        return Err(AppError::Validation(format!(
            "Payload too large: {} bytes (max {})",
            req.value.len(),
            limits.max_payload_bytes
        )));
    }

    Ok(queue)
}

/// Execute put use case
///
/// # Arguments
///
/// * `store` - Queue store
/// * `id_provider` - ID generator (injected for determinism)
/// * `time_provider` - Time provider (injected for determinism)
/// * `limits` - Payload limits
/// * `req` - Put request
pub async fn execute(
    store: &dyn QueueStore,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    limits: &QueueLimits,
    req: PutRequest,
) -> Result<PutReceipt> {
    let queue = validate_request(&req, limits)?;

    let message = Message::new(id_provider.generate_id(), req.value, time_provider.now_millis());
    let message_id = message.id.clone();

    let depth = store.put(&queue, message).await?;

    debug!(queue = %queue, message_id = %message_id, depth, "Message enqueued");

    Ok(PutReceipt {
        queue,
        message_id,
        depth,
    })
}
