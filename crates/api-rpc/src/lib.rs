//! JSON-RPC API Layer
//!
//! JSON-RPC 2.0 surface used by the SDK and CLI: queue put/get plus admin
//! introspection. Producers and consumers that only need the basics can use
//! the HTTP transport instead.

pub mod error;
pub mod handler;
pub mod rate_limiter;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig, RpcServerHandle};
