//! Lineup Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{GetResponse, ListQueuesResponse, PutResponse, StatsResponse};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use std::time::Duration;

/// Client-side request timeout
///
/// Longer than the broker's maximum RPC wait (30 s) so a blocking get is
/// always answered by the broker rather than cut off here.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

/// Lineup broker client
///
/// # Example
///
/// ```no_run
/// use lineup_sdk::LineupClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = LineupClient::connect("http://127.0.0.1:9527").await?;
/// # Ok(())
/// # }
/// ```
pub struct LineupClient {
    client: HttpClient,
}

impl LineupClient {
    /// Connect to a Lineup daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:9527`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(REQUEST_TIMEOUT)
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Append a payload to a queue
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use lineup_sdk::LineupClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = LineupClient::connect("http://127.0.0.1:9527").await?;
    /// let receipt = client.put("orders", "x1").await?;
    /// println!("{} now holds {} message(s)", receipt.queue, receipt.depth);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn put(&self, queue: impl Into<String>, value: impl Into<String>) -> Result<PutResponse> {
        let mut params = ObjectParams::new();
        params.insert("queue", queue.into())?;
        params.insert("value", value.into())?;

        Ok(self.client.request("queue.put.v1", params).await?)
    }

    /// Take the oldest payload from a queue
    ///
    /// Waits up to `timeout_secs` (0 = check once). The broker caps the wait
    /// at 30 seconds.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use lineup_sdk::LineupClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = LineupClient::connect("http://127.0.0.1:9527").await?;
    /// match client.get("orders", 2).await?.value {
    ///     Some(value) => println!("Got {}", value),
    ///     None => println!("Queue stayed empty"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get(&self, queue: impl Into<String>, timeout_secs: u64) -> Result<GetResponse> {
        let mut params = ObjectParams::new();
        params.insert("queue", queue.into())?;
        params.insert("timeout_secs", timeout_secs)?;

        Ok(self.client.request("queue.get.v1", params).await?)
    }

    /// List every queue the broker has seen
    pub async fn list_queues(&self) -> Result<Vec<String>> {
        let response: ListQueuesResponse = self.client.request("queue.list.v1", rpc_params![]).await?;
        Ok(response.queues)
    }

    /// Broker-wide and per-queue statistics
    pub async fn stats(&self) -> Result<StatsResponse> {
        Ok(self.client.request("admin.stats.v1", rpc_params![]).await?)
    }
}
