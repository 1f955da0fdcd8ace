//! RPC Method Handlers
//!
//! Implements the business logic for each JSON-RPC method.

use crate::error::{throttled, to_rpc_error};
use crate::rate_limiter::RateLimiter;
use crate::types::{
    GetRequest, GetResponse, ListQueuesResponse, PutRequest, PutResponse, StatsResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use lineup_core::application::constants::MAX_RPC_WAIT_SECS;
use lineup_core::application::queue::{self, wait_budget};
use lineup_core::application::{QueueService, ShutdownToken};
use std::sync::Arc;
use std::time::Instant;

/// Rate limiter settings for `queue.put.v1`
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub burst: u32,
    pub per_second: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            burst: 200,
            per_second: 100,
        }
    }
}

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<QueueService>,
    rate_limiter: RateLimiter,
    shutdown: ShutdownToken,
    start_time: Instant,
}

impl RpcHandler {
    pub fn new(
        service: Arc<QueueService>,
        rate_limit: RateLimitConfig,
        shutdown: ShutdownToken,
    ) -> Self {
        Self {
            service,
            rate_limiter: RateLimiter::new(rate_limit.burst, rate_limit.per_second),
            shutdown,
            start_time: Instant::now(),
        }
    }

    /// queue.put.v1
    pub async fn put(&self, params: PutRequest) -> Result<PutResponse, ErrorObjectOwned> {
        // Rate limiting check (DoS protection)
        if !self.rate_limiter.check() {
            return Err(throttled());
        }

        let receipt = self
            .service
            .put(queue::PutRequest {
                queue: params.queue,
                value: params.value,
            })
            .await
            .map_err(to_rpc_error)?;

        Ok(PutResponse {
            queue: receipt.queue.to_string(),
            message_id: receipt.message_id,
            depth: receipt.depth,
        })
    }

    /// queue.get.v1
    ///
    /// Waits are clamped to `MAX_RPC_WAIT_SECS` so the HTTP client on the
    /// other side does not time out first.
    pub async fn get(&self, params: GetRequest) -> Result<GetResponse, ErrorObjectOwned> {
        let timeout_secs = params.timeout_secs.min(MAX_RPC_WAIT_SECS as i64);
        let req = queue::GetRequest::new(params.queue.clone(), wait_budget(timeout_secs));

        let message = self
            .service
            .get(req, Some(self.shutdown.clone()))
            .await
            .map_err(to_rpc_error)?;

        Ok(match message {
            Some(message) => GetResponse {
                queue: params.queue,
                found: true,
                value: Some(message.payload),
                message_id: Some(message.id),
                enqueued_at: Some(message.enqueued_at),
            },
            None => GetResponse {
                queue: params.queue,
                found: false,
                value: None,
                message_id: None,
                enqueued_at: None,
            },
        })
    }

    /// queue.list.v1
    pub async fn list_queues(&self) -> Result<ListQueuesResponse, ErrorObjectOwned> {
        let queues = self.service.list_queues().await.map_err(to_rpc_error)?;

        Ok(ListQueuesResponse {
            queues: queues.into_iter().map(String::from).collect(),
        })
    }

    /// admin.stats.v1
    pub async fn stats(&self) -> Result<StatsResponse, ErrorObjectOwned> {
        let stats = self.service.stats().await.map_err(to_rpc_error)?;

        Ok(StatsResponse {
            total_queues: stats.total_queues,
            total_pending: stats.total_pending,
            total_enqueued: stats.total_enqueued,
            total_dequeued: stats.total_dequeued,
            waiting_consumers: stats.waiting_consumers,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            queues: stats.queues,
        })
    }
}
