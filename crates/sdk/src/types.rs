//! SDK Response Types
//!
//! Mirrors the JSON-RPC results from the api-rpc crate.

use serde::Deserialize;

/// Response from `queue.put.v1`
#[derive(Debug, Clone, Deserialize)]
pub struct PutResponse {
    pub queue: String,
    pub message_id: String,
    pub depth: usize,
}

/// Response from `queue.get.v1`
#[derive(Debug, Clone, Deserialize)]
pub struct GetResponse {
    pub queue: String,
    pub found: bool,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub enqueued_at: Option<i64>,
}

/// Response from `queue.list.v1`
#[derive(Debug, Clone, Deserialize)]
pub struct ListQueuesResponse {
    pub queues: Vec<String>,
}

/// One queue in `admin.stats.v1`
#[derive(Debug, Clone, Deserialize)]
pub struct QueueStats {
    pub name: String,
    pub depth: usize,
    pub enqueued_total: u64,
    pub dequeued_total: u64,
    pub waiting_consumers: usize,
    pub oldest_enqueued_at: Option<i64>,
}

/// Response from `admin.stats.v1`
#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    pub total_queues: usize,
    pub total_pending: usize,
    pub total_enqueued: u64,
    pub total_dequeued: u64,
    pub waiting_consumers: usize,
    pub uptime_seconds: u64,
    pub queues: Vec<QueueStats>,
}
