//! HTTP API Layer
//!
//! Plain HTTP/1.1 front door for producers and consumers:
//!
//! - `PUT /<queue>?v=<value>` appends a payload
//! - `GET /<queue>?timeout=<secs>` takes the oldest payload, optionally waiting
//!
//! Anything else is answered with 405 without touching the broker.

pub mod error;
pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use handler::HttpHandler;
pub use server::{HttpServer, HttpServerConfig};
