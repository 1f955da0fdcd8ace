//! JSON-RPC Server
//!
//! Serves JSON-RPC 2.0 over HTTP on a localhost TCP port.

use crate::handler::{RateLimitConfig, RpcHandler};
use crate::types::{GetRequest, PutRequest};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use lineup_core::application::{QueueService, ShutdownToken};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9527;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
    pub rate_limit: RateLimitConfig,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

/// A started server: its bound address plus the jsonrpsee stop handle
pub struct RpcServerHandle {
    addr: SocketAddr,
    handle: ServerHandle,
}

impl RpcServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting calls; in-flight calls finish on their own
    pub fn stop(&self) -> Result<(), String> {
        self.handle.stop().map_err(|e| e.to_string())
    }

    pub async fn stopped(self) {
        self.handle.stopped().await
    }
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<QueueService>, shutdown: ShutdownToken) -> Self {
        let handler = Arc::new(RpcHandler::new(service, config.rate_limit, shutdown));
        Self { config, handler }
    }

    /// Start the JSON-RPC server
    pub async fn start(self) -> Result<RpcServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let mut module = RpcModule::new(());

        // Register methods
        let handler = self.handler.clone();
        module
            .register_async_method("queue.put.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: PutRequest = params.parse()?;
                    handler.put(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.get.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: GetRequest = params.parse()?;
                    handler.get(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.list.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.list_queues().await }
            })
            .map_err(|e| e.to_string())?;

        // Admin APIs
        let handler = self.handler.clone();
        module
            .register_async_method("admin.stats.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.stats().await }
            })
            .map_err(|e| e.to_string())?;

        info!(addr = %local_addr, "JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok(RpcServerHandle {
            addr: local_addr,
            handle,
        })
    }
}
