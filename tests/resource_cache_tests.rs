//! Resource Cache Tests
//!
//! Tests for:
//! - Idempotent creation: one producer invocation per key, first writer wins
//! - Concurrency: N racing `add` calls construct exactly once
//! - Removal semantics: remove-then-add recreates, absent keys are no-ops
//! - Failure semantics: a failed producer leaves no partial registration
//! - Snapshot iteration: isolation from later mutation, restartability
//! - Lifecycle hooks: initialise_all / cleanup_all / cache-level cleaner

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

use ember::errors::{Error, Result};
use ember::{CacheElement, Lifecycle, LifecycleState, ResourceCache};

#[derive(Debug)]
struct Widget {
    size: u32,
    lifecycle: Lifecycle,
}

impl Widget {
    fn new(size: u32) -> Self {
        Self {
            size,
            lifecycle: Lifecycle::new(),
        }
    }
}

impl CacheElement for Widget {
    fn initialise(&self) -> Result<()> {
        self.lifecycle.mark_initialised();
        Ok(())
    }

    fn cleanup(&self) {
        self.lifecycle.mark_cleaned_up();
    }
}

/// Cache whose producer counts its invocations and rejects size zero.
fn counting_cache() -> (ResourceCache<u32, Widget>, Arc<AtomicUsize>) {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();
    let cache = ResourceCache::new(
        "widgets",
        Box::new(move |key: &String, size: &u32| {
            if *size == 0 {
                return Err(Error::ConstructionFailed {
                    key: key.clone(),
                    reason: "zero size".to_string(),
                });
            }
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Widget::new(*size))
        }),
    );
    (cache, built)
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Idempotent Creation
// ============================================================================

#[test]
fn add_constructs_on_first_request_only() {
    let (cache, built) = counting_cache();

    let first = cache.add("a".to_string(), 7).unwrap();
    let second = cache.add("a".to_string(), 7).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn duplicate_add_with_different_args_keeps_first() {
    init_logs();
    let (cache, built) = counting_cache();

    let first = cache.add("a".to_string(), 8).unwrap();
    // Logged as ignored; the original construction stands.
    let second = cache.add("a".to_string(), 2).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.size, 8);
    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[test]
fn find_never_constructs() {
    let (cache, built) = counting_cache();

    assert!(cache.find("missing").is_none());
    assert!(!cache.has("missing"));
    assert_eq!(built.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Removal
// ============================================================================

#[test]
fn remove_absent_key_is_noop() {
    let (cache, _) = counting_cache();
    assert!(!cache.remove("nothing"));
}

#[test]
fn remove_then_add_recreates() {
    let (cache, built) = counting_cache();

    let first = cache.add("a".to_string(), 3).unwrap();
    assert!(cache.remove("a"));
    assert!(cache.find("a").is_none());

    let second = cache.add("a".to_string(), 5).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.size, 5);
    assert_eq!(built.load(Ordering::SeqCst), 2);
}

#[test]
fn remove_drops_only_the_cache_reference() {
    let (cache, _) = counting_cache();

    let held = cache.add("a".to_string(), 3).unwrap();
    assert!(cache.remove("a"));

    // The caller's reference keeps the element alive.
    assert_eq!(held.size, 3);
}

#[test]
fn clear_runs_cleaner_on_every_element() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();
    let cache: ResourceCache<u32, Widget> = ResourceCache::new(
        "widgets",
        Box::new(move |_key, size: &u32| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Widget::new(*size))
        }),
    )
    .with_cleaner(Box::new(|w: &Arc<Widget>| w.cleanup()));

    let a = cache.add("a".to_string(), 1).unwrap();
    let b = cache.add("b".to_string(), 2).unwrap();
    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(a.lifecycle.state(), LifecycleState::CleanedUp);
    assert_eq!(b.lifecycle.state(), LifecycleState::CleanedUp);
}

// ============================================================================
// Failure Semantics
// ============================================================================

#[test]
fn failed_construction_registers_nothing() {
    let (cache, built) = counting_cache();

    let err = cache.add("a".to_string(), 0).unwrap_err();
    assert!(matches!(err, Error::ConstructionFailed { .. }));
    assert!(!cache.has("a"));
    assert_eq!(built.load(Ordering::SeqCst), 0);

    // A later, well-formed add starts from a clean slate.
    let widget = cache.add("a".to_string(), 4).unwrap();
    assert_eq!(widget.size, 4);
    assert_eq!(built.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Snapshot Iteration
// ============================================================================

#[test]
fn snapshot_is_isolated_from_later_mutation() {
    let (cache, _) = counting_cache();
    cache.add("a".to_string(), 1).unwrap();
    cache.add("b".to_string(), 2).unwrap();

    let snapshot = cache.snapshot();
    cache.remove("a");
    cache.add("c".to_string(), 3).unwrap();

    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.iter().any(|(k, _)| k == "a"));
    assert!(!snapshot.iter().any(|(k, _)| k == "c"));
}

#[test]
fn snapshot_is_restartable() {
    let (cache, _) = counting_cache();
    cache.add("a".to_string(), 1).unwrap();
    cache.add("b".to_string(), 2).unwrap();

    let snapshot = cache.snapshot();
    assert_eq!(snapshot.iter().count(), 2);
    assert_eq!(snapshot.iter().count(), 2);
}

#[test]
fn for_each_visits_every_pair_and_may_reenter() {
    let (cache, _) = counting_cache();
    cache.add("a".to_string(), 1).unwrap();
    cache.add("b".to_string(), 2).unwrap();

    let mut visited = Vec::new();
    cache.for_each(|key, element| {
        // Re-entering the cache from the visitor must not deadlock.
        assert!(cache.has(key.as_str()));
        visited.push((key.clone(), element.size));
    });

    visited.sort();
    assert_eq!(visited, vec![("a".to_string(), 1), ("b".to_string(), 2)]);
}

// ============================================================================
// Lifecycle Hooks
// ============================================================================

#[test]
fn initialise_all_and_cleanup_all_run_element_hooks() {
    let (cache, _) = counting_cache();
    let a = cache.add("a".to_string(), 1).unwrap();

    assert_eq!(a.lifecycle.state(), LifecycleState::Constructed);
    cache.initialise_all().unwrap();
    assert_eq!(a.lifecycle.state(), LifecycleState::Initialised);
    cache.cleanup_all();
    assert_eq!(a.lifecycle.state(), LifecycleState::CleanedUp);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn concurrent_adds_construct_exactly_once() {
    const THREADS: usize = 8;

    let (cache, built) = counting_cache();
    let cache = Arc::new(cache);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = cache.clone();
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                barrier.wait();
                cache.add("shared".to_string(), 9).unwrap()
            })
        })
        .collect();

    let elements: Vec<Arc<Widget>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(built.load(Ordering::SeqCst), 1);
    for element in &elements[1..] {
        assert!(Arc::ptr_eq(&elements[0], element));
    }
}

#[test]
fn concurrent_adds_for_distinct_keys_all_construct() {
    const THREADS: usize = 8;

    let (cache, built) = counting_cache();
    let cache = Arc::new(cache);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let cache = cache.clone();
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                barrier.wait();
                cache.add(format!("k{i}"), 1).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(built.load(Ordering::SeqCst), THREADS);
    assert_eq!(cache.len(), THREADS);
}
