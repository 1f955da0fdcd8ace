//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use lineup_core::domain::QueueStats;
use serde::{Deserialize, Serialize};

/// queue.put.v1 - Append a payload
#[derive(Debug, Deserialize)]
pub struct PutRequest {
    pub queue: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    pub queue: String,
    pub message_id: String,
    pub depth: usize,
}

/// queue.get.v1 - Take the oldest payload, optionally waiting
#[derive(Debug, Deserialize)]
pub struct GetRequest {
    pub queue: String,
    #[serde(default)]
    pub timeout_secs: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub queue: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enqueued_at: Option<i64>,
}

/// queue.list.v1 - List known queues (no parameters)
#[derive(Debug, Clone, Serialize)]
pub struct ListQueuesResponse {
    pub queues: Vec<String>,
}

/// admin.stats.v1 - Broker statistics (no parameters)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub total_queues: usize,
    pub total_pending: usize,
    pub total_enqueued: u64,
    pub total_dequeued: u64,
    pub waiting_consumers: usize,
    pub uptime_seconds: u64,
    pub queues: Vec<QueueStats>,
}
