//! Tests for the per-principal response cache

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bcon_application::{CacheKey, ResponseCache};
use bcon_domain::{Error, Principal};

use crate::test_utils::MapCache;

fn cache() -> (Arc<MapCache>, ResponseCache) {
    let backing = Arc::new(MapCache::default());
    let cache = ResponseCache::new(backing.clone(), Duration::from_secs(60));
    (backing, cache)
}

#[tokio::test]
async fn test_value_is_computed_once() {
    let (_, cache) = cache();
    let key = CacheKey::new(&Principal::new("alice"), "clients", &[]);
    let calls = AtomicUsize::new(0);

    for _ in 0..3 {
        let value: u32 = cache
            .get_or_compute(&key, None, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_errors_are_not_cached() {
    let (backing, cache) = cache();
    let key = CacheKey::new(&Principal::new("alice"), "clients", &[]);

    let result: Result<u32, Error> = cache
        .get_or_compute(&key, None, || async { Err(Error::upstream(None, "down")) })
        .await;

    assert!(result.is_err());
    assert_eq!(backing.len(), 0);
    assert_eq!(cache.pending(), 0);
}

#[tokio::test]
async fn test_expired_entry_is_recomputed() {
    let (_, cache) = cache();
    let key = CacheKey::new(&Principal::new("alice"), "report", &[]);

    let first: u32 = cache
        .get_or_compute(&key, Some(Duration::ZERO), || async { Ok(1) })
        .await
        .unwrap();
    let second: u32 = cache
        .get_or_compute(&key, None, || async { Ok(2) })
        .await
        .unwrap();

    assert_eq!((first, second), (1, 2));
}

#[tokio::test]
async fn test_invalidate_single_key() {
    let (_, cache) = cache();
    let p = Principal::new("alice");
    let key = CacheKey::new(&p, "clients", &[("agent", Some("srv1"))]);

    let _: u32 = cache.get_or_compute(&key, None, || async { Ok(1) }).await.unwrap();
    assert!(cache.invalidate(&key).await.unwrap());
    let v: u32 = cache.get_or_compute(&key, None, || async { Ok(2) }).await.unwrap();

    assert_eq!(v, 2);
}

#[tokio::test]
async fn test_concurrent_misses_are_single_flighted() {
    let (_, cache) = cache();
    let cache = Arc::new(cache);
    let key = CacheKey::new(&Principal::new("alice"), "clients", &[]);
    let calls = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = cache.clone();
        let key = key.clone();
        let calls = calls.clone();
        handles.push(tokio::spawn(async move {
            cache
                .get_or_compute(&key, None, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Ok::<u32, Error>(42)
                })
                .await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 42);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_backend_outage_computes_uncached() {
    let (backing, cache) = cache();
    backing.go_down();
    let key = CacheKey::new(&Principal::new("alice"), "clients", &[]);

    let v: u32 = cache.get_or_compute(&key, None, || async { Ok(5) }).await.unwrap();

    assert_eq!(v, 5);
    assert!(cache.invalidate_all().await.is_err());
}

#[tokio::test]
async fn test_invalidation_during_compute_is_not_undone() {
    let (_, cache) = cache();
    let cache = Arc::new(cache);
    let key = CacheKey::new(&Principal::new("admin"), "clients", &[]);
    let clients = Arc::new(Mutex::new(vec!["c1".to_string()]));

    let slow = tokio::spawn({
        let (cache, key, clients) = (cache.clone(), key.clone(), clients.clone());
        async move {
            cache
                .get_or_compute(&key, None, || async move {
                    let snapshot = clients.lock().unwrap().clone();
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    Ok::<_, Error>(snapshot)
                })
                .await
        }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    clients.lock().unwrap().push("c4".to_string());
    cache.invalidate_all().await.unwrap();

    assert_eq!(slow.await.unwrap().unwrap(), vec!["c1"]);
    let fresh: Vec<String> = cache
        .get_or_compute(&key, None, || async { Ok(clients.lock().unwrap().clone()) })
        .await
        .unwrap();
    assert_eq!(fresh, vec!["c1", "c4"]);
}

#[tokio::test]
async fn test_cancelled_compute_releases_its_key() {
    let (backing, cache) = cache();
    let key = CacheKey::new(&Principal::new("alice"), "report", &[]);

    let outcome = tokio::time::timeout(
        Duration::from_millis(20),
        cache.get_or_compute(&key, None, || async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<u32, Error>(1)
        }),
    )
    .await;

    assert!(outcome.is_err());
    assert_eq!(cache.pending(), 0);
    assert_eq!(backing.len(), 0);
}
