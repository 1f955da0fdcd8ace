//! Broker semantics through the application layer
//!
//! `QueueService` backed by the real `InMemoryQueueStore`, real clock.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lineup_core::application::queue::{GetRequest, PutRequest};
use lineup_core::application::{shutdown_channel, QueueLimits, QueueService};
use lineup_core::error::AppError;
use lineup_core::port::id_provider::UuidProvider;
use lineup_core::port::time_provider::SystemTimeProvider;
use lineup_infra_memory::InMemoryQueueStore;

fn service() -> Arc<QueueService> {
    Arc::new(QueueService::new(
        Arc::new(InMemoryQueueStore::new()),
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
        QueueLimits::default(),
    ))
}

async fn put(service: &QueueService, queue: &str, value: &str) {
    service
        .put(PutRequest {
            queue: queue.to_string(),
            value: value.to_string(),
        })
        .await
        .unwrap();
}

async fn get(service: &QueueService, queue: &str, timeout: Duration) -> Option<String> {
    service
        .get(GetRequest::new(queue, timeout), None)
        .await
        .unwrap()
        .map(|m| m.into_payload())
}

#[tokio::test]
async fn test_orders_walkthrough() {
    let service = service();

    put(&service, "orders", "x1").await;
    assert_eq!(get(&service, "orders", Duration::ZERO).await.as_deref(), Some("x1"));
    assert_eq!(get(&service, "orders", Duration::ZERO).await, None);

    let producer = {
        let service = service.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            put(&service, "orders", "x2").await;
        })
    };

    let started = Instant::now();
    let value = get(&service, "orders", Duration::from_secs(2)).await;
    let waited = started.elapsed();

    assert_eq!(value.as_deref(), Some("x2"));
    assert!(waited >= Duration::from_millis(450), "returned too early: {:?}", waited);
    assert!(waited < Duration::from_millis(1500), "woke too late: {:?}", waited);
    producer.await.unwrap();
}

#[tokio::test]
async fn test_fifo_per_queue() {
    let service = service();

    for i in 0..20 {
        put(&service, "fifo", &format!("m{}", i)).await;
    }
    for i in 0..20 {
        assert_eq!(
            get(&service, "fifo", Duration::ZERO).await,
            Some(format!("m{}", i))
        );
    }
}

#[tokio::test]
async fn test_empty_get_returns_immediately() {
    let service = service();

    let started = Instant::now();
    assert_eq!(get(&service, "idle", Duration::ZERO).await, None);
    assert!(started.elapsed() < Duration::from_millis(100));
}

#[tokio::test]
async fn test_timeout_without_put() {
    let service = service();

    let started = Instant::now();
    assert_eq!(get(&service, "idle", Duration::from_secs(1)).await, None);
    let waited = started.elapsed();

    assert!(waited >= Duration::from_secs(1));
    assert!(waited < Duration::from_millis(1500), "overslept: {:?}", waited);
}

#[tokio::test]
async fn test_names_are_isolated() {
    let service = service();

    put(&service, "a", "for-a").await;

    assert_eq!(get(&service, "b", Duration::from_millis(200)).await, None);
    assert_eq!(get(&service, "a", Duration::ZERO).await.as_deref(), Some("for-a"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_loss_no_duplication() {
    const PUTS: usize = 200;
    const GETS: usize = 250;

    let service = service();

    let consumers: Vec<_> = (0..GETS)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { get(&service, "load", Duration::from_secs(3)).await })
        })
        .collect();

    let producers: Vec<_> = (0..PUTS)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move { put(&service, "load", &i.to_string()).await })
        })
        .collect();

    for producer in futures::future::join_all(producers).await {
        producer.unwrap();
    }

    let mut delivered = HashSet::new();
    let mut empty = 0;
    for result in futures::future::join_all(consumers).await {
        match result.unwrap() {
            Some(value) => assert!(delivered.insert(value), "duplicate delivery"),
            None => empty += 1,
        }
    }

    assert_eq!(delivered.len(), PUTS);
    assert_eq!(empty, GETS - PUTS);
}

#[tokio::test]
async fn test_shutdown_releases_waiters_without_losing_later_puts() {
    let service = service();
    let (tx, token) = shutdown_channel();

    let waiter = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .get(GetRequest::new("jobs", Duration::from_secs(30)), Some(token))
                .await
                .unwrap()
        })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    tx.shutdown();

    let released = tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("waiter not released")
        .unwrap();
    assert!(released.is_none());

    put(&service, "jobs", "after").await;
    assert_eq!(get(&service, "jobs", Duration::ZERO).await.as_deref(), Some("after"));
}

#[tokio::test]
async fn test_stats_track_traffic() {
    let service = service();

    put(&service, "s", "1").await;
    put(&service, "s", "2").await;
    get(&service, "s", Duration::ZERO).await;

    let waiter = {
        let service = service.clone();
        tokio::spawn(async move { get(&service, "w", Duration::from_secs(5)).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let stats = service.stats().await.unwrap();
    assert_eq!(stats.total_queues, 2);
    assert_eq!(stats.total_pending, 1);
    assert_eq!(stats.total_enqueued, 2);
    assert_eq!(stats.total_dequeued, 1);
    assert_eq!(stats.waiting_consumers, 1);

    put(&service, "w", "wake").await;
    assert_eq!(waiter.await.unwrap().as_deref(), Some("wake"));

    let stats = service.stats().await.unwrap();
    assert_eq!(stats.waiting_consumers, 0);
}

#[tokio::test]
async fn test_validation_happens_before_the_store() {
    let service = Arc::new(QueueService::new(
        Arc::new(InMemoryQueueStore::new()),
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
        QueueLimits {
            max_payload_bytes: 4,
        },
    ));

    let err = service
        .put(PutRequest {
            queue: String::new(),
            value: "x".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Domain(_)));

    let err = service
        .put(PutRequest {
            queue: "q".to_string(),
            value: "too long".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert!(service.list_queues().await.unwrap().is_empty());
}
