//! Lineup CLI - Command-line interface for the Lineup broker

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9527";

#[derive(Parser)]
#[command(name = "lineup")]
#[command(about = "Lineup message broker CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "LINEUP_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Append a value to a queue
    Put {
        /// Queue name
        queue: String,

        /// Value to enqueue
        value: String,
    },

    /// Take the oldest value from a queue
    Get {
        /// Queue name
        queue: String,

        /// Seconds to wait for a value (capped at 30 by the daemon)
        #[arg(short, long, default_value = "0")]
        timeout: u64,
    },

    /// List known queues
    Queues,

    /// Show broker status and per-queue counters
    Status,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct PutResult {
    queue: String,
    message_id: String,
    depth: usize,
}

#[derive(Deserialize)]
struct GetResult {
    found: bool,
    value: Option<String>,
}

#[derive(Deserialize, Tabled)]
struct QueueRow {
    name: String,
    depth: usize,
    #[serde(rename = "enqueued_total")]
    enqueued: u64,
    #[serde(rename = "dequeued_total")]
    dequeued: u64,
    #[serde(rename = "waiting_consumers")]
    waiting: usize,
}

#[derive(Deserialize)]
struct StatsResult {
    total_queues: usize,
    total_pending: usize,
    total_enqueued: u64,
    total_dequeued: u64,
    waiting_consumers: usize,
    uptime_seconds: u64,
    queues: Vec<QueueRow>,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Put { queue, value } => {
            let params = json!({
                "queue": queue,
                "value": value,
            });

            let result = call_rpc(&cli.rpc_url, "queue.put.v1", params).await?;
            let put_result: PutResult = serde_json::from_value(result)?;

            println!("{}", "✓ Value enqueued".green().bold());
            println!();

            let table = Table::new(vec![put_result]).to_string();
            println!("{}", table);
        }

        Commands::Get { queue, timeout } => {
            let params = json!({
                "queue": queue,
                "timeout_secs": timeout,
            });

            let result = call_rpc(&cli.rpc_url, "queue.get.v1", params).await?;
            let get_result: GetResult = serde_json::from_value(result)?;

            match get_result.value {
                Some(value) if get_result.found => println!("{}", value),
                _ => {
                    eprintln!("{}", format!("Queue '{}' is empty", queue).yellow());
                    std::process::exit(1);
                }
            }
        }

        Commands::Queues => {
            let result = call_rpc(&cli.rpc_url, "queue.list.v1", json!({})).await?;

            let queues: Vec<String> = serde_json::from_value(result["queues"].clone())
                .context("Malformed queue list")?;

            if queues.is_empty() {
                println!("{}", "No queues yet".yellow());
            } else {
                for queue in queues {
                    println!("{}", queue);
                }
            }
        }

        Commands::Status => {
            println!("{}", "Broker Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "admin.stats.v1", json!({})).await {
                Ok(result) => {
                    let stats: StatsResult = serde_json::from_value(result)?;

                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    println!("  {} {}", "Queues:".bold(), stats.total_queues);
                    println!("  {} {}", "Pending:".bold(), stats.total_pending);
                    println!("  {} {}", "Enqueued:".bold(), stats.total_enqueued);
                    println!("  {} {}", "Dequeued:".bold(), stats.total_dequeued);
                    println!("  {} {}", "Waiting:".bold(), stats.waiting_consumers);
                    println!("  {} {} seconds", "Uptime:".bold(), stats.uptime_seconds);

                    if !stats.queues.is_empty() {
                        println!();
                        println!("{}", Table::new(stats.queues));
                    }
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
