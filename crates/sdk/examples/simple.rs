//! Simple SDK Example
//!
//! Demonstrates a producer and a blocking consumer on one queue.
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package lineup-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --package lineup-sdk --example simple
//!    ```

use lineup_sdk::LineupClient;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Lineup SDK - Simple Example");
    println!("===========================\n");

    // 1. Connect to daemon
    println!("1. Connecting to daemon...");
    let client = LineupClient::connect("http://127.0.0.1:9527").await?;
    println!("   ✓ Connected\n");

    // 2. Start a consumer that waits for the next message
    println!("2. Starting a blocking consumer (timeout 5s)...");
    let consumer = tokio::spawn(async move {
        let client = LineupClient::connect("http://127.0.0.1:9527").await?;
        client.get("examples", 5).await
    });

    // 3. Produce after a short delay
    tokio::time::sleep(Duration::from_millis(500)).await;
    println!("3. Putting a message...");
    let receipt = client.put("examples", "hello from the sdk").await?;
    println!("   ✓ Message ID: {}", receipt.message_id);
    println!("   ✓ Queue depth: {}\n", receipt.depth);

    // 4. The consumer wakes up as soon as the message lands
    let response = consumer.await??;
    match response.value {
        Some(value) => println!("4. Consumer received: {}\n", value),
        None => println!("4. Consumer timed out\n"),
    }

    // 5. Broker stats
    let stats = client.stats().await?;
    println!("5. Broker stats:");
    println!("   Queues:   {}", stats.total_queues);
    println!("   Pending:  {}", stats.total_pending);
    println!("   Enqueued: {}", stats.total_enqueued);
    println!("   Dequeued: {}", stats.total_dequeued);

    Ok(())
}
