//! JSON-RPC transport end to end
//!
//! A real `RpcServer` on an ephemeral port, driven through `LineupClient`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use lineup_api_rpc::handler::RateLimitConfig;
use lineup_api_rpc::{RpcServer, RpcServerConfig, RpcServerHandle};
use lineup_core::application::{shutdown_channel, QueueLimits, QueueService, ShutdownSender};
use lineup_core::port::id_provider::UuidProvider;
use lineup_core::port::time_provider::SystemTimeProvider;
use lineup_infra_memory::InMemoryQueueStore;
use lineup_sdk::{LineupClient, SdkError};

struct TestServer {
    client: LineupClient,
    handle: RpcServerHandle,
    shutdown: ShutdownSender,
}

async fn start_server(rate_limit: RateLimitConfig) -> TestServer {
    let service = Arc::new(QueueService::new(
        Arc::new(InMemoryQueueStore::new()),
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
        QueueLimits {
            max_payload_bytes: 64,
        },
    ));
    let config = RpcServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        rate_limit,
    };
    let (shutdown, token) = shutdown_channel();

    let handle = RpcServer::new(config, service, token).start().await.unwrap();
    let client = LineupClient::connect(format!("http://{}", handle.local_addr()))
        .await
        .unwrap();

    TestServer {
        client,
        handle,
        shutdown,
    }
}

#[tokio::test]
async fn test_put_get_roundtrip() {
    let server = start_server(RateLimitConfig::default()).await;

    let receipt = server.client.put("orders", "x1").await.unwrap();
    assert_eq!(receipt.queue, "orders");
    assert_eq!(receipt.depth, 1);
    assert!(!receipt.message_id.is_empty());

    let got = server.client.get("orders", 0).await.unwrap();
    assert!(got.found);
    assert_eq!(got.value.as_deref(), Some("x1"));
    assert_eq!(got.message_id.as_deref(), Some(receipt.message_id.as_str()));
    assert!(got.enqueued_at.is_some());

    let empty = server.client.get("orders", 0).await.unwrap();
    assert!(!empty.found);
    assert!(empty.value.is_none());
}

#[tokio::test]
async fn test_blocking_get_woken_by_put() {
    let server = start_server(RateLimitConfig::default()).await;
    let url = format!("http://{}", server.handle.local_addr());

    let consumer = tokio::spawn(async move {
        let client = LineupClient::connect(url).await.unwrap();
        let started = Instant::now();
        let got = client.get("orders", 5).await.unwrap();
        (got, started.elapsed())
    });

    tokio::time::sleep(Duration::from_millis(300)).await;
    server.client.put("orders", "x2").await.unwrap();

    let (got, waited) = consumer.await.unwrap();
    assert_eq!(got.value.as_deref(), Some("x2"));
    assert!(waited < Duration::from_secs(2), "woke too late: {:?}", waited);
}

#[tokio::test]
async fn test_list_and_stats() {
    let server = start_server(RateLimitConfig::default()).await;

    server.client.put("beta", "1").await.unwrap();
    server.client.put("alpha", "1").await.unwrap();
    server.client.put("alpha", "2").await.unwrap();
    server.client.get("alpha", 0).await.unwrap();

    assert_eq!(server.client.list_queues().await.unwrap(), vec!["alpha", "beta"]);

    let stats = server.client.stats().await.unwrap();
    assert_eq!(stats.total_queues, 2);
    assert_eq!(stats.total_pending, 2);
    assert_eq!(stats.total_enqueued, 3);
    assert_eq!(stats.total_dequeued, 1);
    assert_eq!(stats.waiting_consumers, 0);

    let alpha = &stats.queues[0];
    assert_eq!(alpha.name, "alpha");
    assert_eq!(alpha.depth, 1);
    assert_eq!(alpha.enqueued_total, 2);
    assert_eq!(alpha.dequeued_total, 1);
}

#[tokio::test]
async fn test_validation_errors_use_client_code() {
    let server = start_server(RateLimitConfig::default()).await;

    match server.client.put("", "x").await {
        Err(SdkError::Rpc { code, .. }) => assert_eq!(code, 4000),
        other => panic!("expected validation error, got {:?}", other),
    }

    let oversized = "x".repeat(65);
    match server.client.put("orders", oversized).await {
        Err(SdkError::Rpc { code, message }) => {
            assert_eq!(code, 4000);
            assert!(message.contains("too large"), "{}", message);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_puts_are_rate_limited() {
    let server = start_server(RateLimitConfig {
        burst: 2,
        per_second: 1,
    })
    .await;

    server.client.put("q", "1").await.unwrap();
    server.client.put("q", "2").await.unwrap();

    let err = server.client.put("q", "3").await.unwrap_err();
    assert!(err.is_throttled(), "{:?}", err);

    // Reads are never throttled
    assert!(server.client.get("q", 0).await.unwrap().found);
}

#[tokio::test]
async fn test_shutdown_releases_blocked_get() {
    let server = start_server(RateLimitConfig::default()).await;
    let url = format!("http://{}", server.handle.local_addr());

    let consumer = tokio::spawn(async move {
        let client = LineupClient::connect(url).await.unwrap();
        client.get("jobs", 30).await.unwrap()
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    server.shutdown.shutdown();

    let got = tokio::time::timeout(Duration::from_secs(2), consumer)
        .await
        .expect("blocked get not released")
        .unwrap();
    assert!(!got.found);

    server.handle.stop().unwrap();
    server.handle.stopped().await;
}
