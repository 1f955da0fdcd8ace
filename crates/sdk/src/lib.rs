//! Lineup SDK - Rust Client Library
//!
//! Talks to a Lineup daemon over its JSON-RPC port.
//!
//! # Example
//!
//! ```no_run
//! use lineup_sdk::LineupClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LineupClient::connect("http://127.0.0.1:9527").await?;
//!
//!     client.put("orders", "x1").await?;
//!
//!     if let Some(value) = client.get("orders", 5).await?.value {
//!         println!("Got {}", value);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::LineupClient;
pub use error::{Result, SdkError};
pub use types::{GetResponse, ListQueuesResponse, PutResponse, QueueStats, StatsResponse};
