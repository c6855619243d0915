//! Integration Tests for the Expiring Cache
//!
//! Exercises the public cache handle together with its background reaper.

use std::sync::Arc;
use std::time::Duration;

use expiring_cache::cache::CacheStore;
use expiring_cache::tasks::spawn_reaper_task;
use expiring_cache::{CacheError, ExpiringCache};
use tokio::sync::RwLock;
use tokio::time::sleep;

// == Expiry Timeline ==

#[tokio::test(start_paused = true)]
async fn test_entry_expires_on_eight_second_interval() {
    let cache = ExpiringCache::new(Duration::from_secs(8)).unwrap();

    cache.add("test", "test").await.unwrap();
    assert_eq!(cache.get("test").await.unwrap(), b"test");

    sleep(Duration::from_secs(5)).await;
    assert_eq!(cache.get("test").await.unwrap(), b"test");

    sleep(Duration::from_secs(4)).await;
    assert!(cache.get("test").await.is_none(), "Entry should be gone at t=9s");

    cache.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_bounded_eviction() {
    let interval = Duration::from_secs(4);
    let cache = ExpiringCache::new(interval).unwrap();

    // Land just after construction so the first sweep sees a younger entry.
    sleep(Duration::from_millis(100)).await;
    cache.add("x", b"payload".to_vec()).await.unwrap();

    sleep(interval - Duration::from_millis(500)).await;
    assert_eq!(cache.get("x").await.unwrap(), b"payload");

    sleep(interval * 2).await;
    assert!(cache.get("x").await.is_none());

    let stats = cache.stats().await;
    assert_eq!(stats.evictions, 1);
    assert!(stats.sweeps >= 2);
}

#[tokio::test(start_paused = true)]
async fn test_entry_survives_first_sweep_when_young() {
    let interval = Duration::from_secs(10);
    let cache = ExpiringCache::new(interval).unwrap();

    sleep(Duration::from_secs(9)).await;
    cache.add("late", "v").await.unwrap();

    // Sweep at t=10s sees an entry aged 1s.
    sleep(Duration::from_secs(5)).await;
    assert!(cache.get("late").await.is_some());

    // Sweep at t=20s sees an entry aged 11s.
    sleep(Duration::from_secs(7)).await;
    assert!(cache.get("late").await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_key_can_be_added_again_after_eviction() {
    let cache = ExpiringCache::new(Duration::from_secs(2)).unwrap();

    cache.add("k", "old").await.unwrap();
    sleep(Duration::from_secs(5)).await;
    assert!(cache.get("k").await.is_none());

    cache.add("k", "new").await.unwrap();
    assert_eq!(cache.get("k").await.unwrap(), b"new");
}

// == Insert Contract ==

#[tokio::test]
async fn test_add_is_not_an_overwrite() {
    let cache = ExpiringCache::new(Duration::from_secs(60)).unwrap();

    cache.add("url", b"v1".to_vec()).await.unwrap();
    let result = cache.add("url", b"v2".to_vec()).await;

    assert_eq!(result, Err(CacheError::AlreadyExists("url".to_string())));
    assert_eq!(cache.get("url").await.unwrap(), b"v1");
}

#[tokio::test]
async fn test_empty_key_and_value() {
    let cache = ExpiringCache::new(Duration::from_secs(60)).unwrap();

    cache.add("", Vec::new()).await.unwrap();

    assert_eq!(cache.get("").await, Some(Vec::new()));
}

// == Concurrency ==

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_and_gets_on_disjoint_keys() {
    // Short interval so sweeps run alongside the workers.
    let cache = Arc::new(ExpiringCache::new(Duration::from_millis(250)).unwrap());

    let mut handles = Vec::new();
    for worker in 0..8 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..50 {
                let key = format!("worker{}/item{}", worker, i);
                let value = format!("{}:{}", worker, i).into_bytes();
                cache.add(key.clone(), value.clone()).await.unwrap();
                assert_eq!(cache.get(&key).await, Some(value));
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    // Every insert is either still present or was swept; none were lost.
    let stats = cache.stats().await;
    assert_eq!(stats.hits, 400);
    assert_eq!(stats.rejected_adds, 0);
    assert_eq!(stats.total_entries + stats.evictions as usize, 400);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_on_same_key_insert_once() {
    let cache = Arc::new(ExpiringCache::new(Duration::from_secs(60)).unwrap());

    let mut handles = Vec::new();
    for worker in 0..16u8 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            cache.add("shared", vec![worker]).await.is_ok()
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(cache.stats().await.rejected_adds, 15);
    assert_eq!(cache.get("shared").await.map(|v| v.len()), Some(1));
}

// == Teardown ==

#[tokio::test(start_paused = true)]
async fn test_dropped_reaper_handle_stops_sweeping() {
    let store = Arc::new(RwLock::new(CacheStore::new()));
    store
        .write()
        .await
        .add("k".to_string(), b"v".to_vec())
        .unwrap();

    let reaper = spawn_reaper_task(store.clone(), Duration::from_secs(1));
    drop(reaper);

    // Three intervals pass; a live reaper would have swept the entry.
    sleep(Duration::from_secs(3)).await;

    let guard = store.read().await;
    assert_eq!(guard.len(), 1);
    assert_eq!(guard.stats().sweeps, 0);
    drop(guard);
    assert_eq!(Arc::strong_count(&store), 1, "reaper task still holds the store");
}

#[tokio::test]
async fn test_shutdown_after_use() {
    let cache = ExpiringCache::new(Duration::from_secs(60)).unwrap();
    cache.add("k", "v").await.unwrap();

    cache.stop_reaper();
    cache.stop_reaper();
    cache.shutdown().await;
}
