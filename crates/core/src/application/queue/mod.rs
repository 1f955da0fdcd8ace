// Queue Service - Core use cases for producers and consumers

pub mod get;
pub mod put;

pub use get::{wait_budget, GetRequest};
pub use put::{PutReceipt, PutRequest};

use crate::application::constants::DEFAULT_MAX_PAYLOAD_BYTES;
use crate::application::shutdown::ShutdownToken;
use crate::domain::{Message, QueueName, QueueStats};
use crate::error::Result;
use crate::port::{IdProvider, QueueStore, TimeProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Limits enforced before anything reaches the store
#[derive(Debug, Clone)]
pub struct QueueLimits {
    pub max_payload_bytes: usize,
}

impl Default for QueueLimits {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

/// Broker-wide totals plus the per-queue breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerStats {
    pub total_queues: usize,
    pub total_pending: usize,
    pub total_enqueued: u64,
    pub total_dequeued: u64,
    pub waiting_consumers: usize,
    pub queues: Vec<QueueStats>,
}

impl BrokerStats {
    pub fn from_queues(queues: Vec<QueueStats>) -> Self {
        Self {
            total_queues: queues.len(),
            total_pending: queues.iter().map(|q| q.depth).sum(),
            total_enqueued: queues.iter().map(|q| q.enqueued_total).sum(),
            total_dequeued: queues.iter().map(|q| q.dequeued_total).sum(),
            waiting_consumers: queues.iter().map(|q| q.waiting_consumers).sum(),
            queues,
        }
    }
}

/// Queue Service
pub struct QueueService {
    store: Arc<dyn QueueStore>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    limits: QueueLimits,
}

impl QueueService {
    pub fn new(
        store: Arc<dyn QueueStore>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        limits: QueueLimits,
    ) -> Self {
        Self {
            store,
            id_provider,
            time_provider,
            limits,
        }
    }

    /// Append a payload to a queue
    pub async fn put(&self, req: PutRequest) -> Result<PutReceipt> {
        put::execute(
            self.store.as_ref(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            &self.limits,
            req,
        )
        .await
    }

    /// Take the oldest payload from a queue, waiting up to `req.timeout`
    pub async fn get(
        &self,
        req: GetRequest,
        cancel: Option<ShutdownToken>,
    ) -> Result<Option<Message>> {
        get::execute(self.store.as_ref(), req, cancel).await
    }

    pub async fn list_queues(&self) -> Result<Vec<QueueName>> {
        self.store.list_queues().await
    }

    pub async fn stats(&self) -> Result<BrokerStats> {
        Ok(BrokerStats::from_queues(self.store.stats().await?))
    }
}
