//! Daemon configuration
//!
//! Every setting is a flag with an environment fallback. The HTTP port may
//! also be given as the first positional argument (`lineupd 9000`).

use clap::{Parser, ValueEnum};
use lineup_api_http::server::{DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT};
use lineup_api_http::HttpServerConfig;
use lineup_api_rpc::handler::RateLimitConfig;
use lineup_api_rpc::server::{DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};
use lineup_api_rpc::RpcServerConfig;
use lineup_core::application::constants::DEFAULT_MAX_PAYLOAD_BYTES;
use lineup_core::application::QueueLimits;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, coloured
    Pretty,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "lineupd")]
#[command(about = "Lineup in-memory message broker", long_about = None)]
#[command(version)]
pub struct Config {
    /// HTTP listening port
    #[arg(env = "LINEUP_HTTP_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    pub port: u16,

    /// HTTP bind address
    #[arg(long, env = "LINEUP_HTTP_HOST", default_value = DEFAULT_HTTP_HOST)]
    pub http_host: String,

    /// JSON-RPC listening port
    #[arg(long, env = "LINEUP_RPC_PORT", default_value_t = DEFAULT_RPC_PORT)]
    pub rpc_port: u16,

    /// JSON-RPC bind address
    #[arg(long, env = "LINEUP_RPC_HOST", default_value = DEFAULT_RPC_HOST)]
    pub rpc_host: String,

    /// Log output format
    #[arg(long, env = "LINEUP_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Largest accepted payload in bytes
    #[arg(long, env = "LINEUP_MAX_PAYLOAD_BYTES", default_value_t = DEFAULT_MAX_PAYLOAD_BYTES)]
    pub max_payload_bytes: usize,

    /// Token bucket size for queue.put.v1
    #[arg(long, env = "LINEUP_RATE_LIMIT_BURST", default_value_t = 200)]
    pub rate_limit_burst: u32,

    /// Token refill per second for queue.put.v1
    #[arg(long, env = "LINEUP_RATE_LIMIT_RATE", default_value_t = 100)]
    pub rate_limit_rate: u32,
}

impl Config {
    pub fn http(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.http_host.clone(),
            port: self.port,
        }
    }

    pub fn rpc(&self) -> RpcServerConfig {
        RpcServerConfig {
            host: self.rpc_host.clone(),
            port: self.rpc_port,
            rate_limit: RateLimitConfig {
                burst: self.rate_limit_burst,
                per_second: self.rate_limit_rate,
            },
        }
    }

    pub fn limits(&self) -> QueueLimits {
        QueueLimits {
            max_payload_bytes: self.max_payload_bytes,
        }
    }
}
