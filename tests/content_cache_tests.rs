//! Integration Tests for the Content Cache
//!
//! Drives the filesystem-backed cache end to end against a temporary content
//! directory, with a manual clock for the TTL scenarios.

use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use garden_cache::cache::ManualClock;
use garden_cache::content::{FsLoader, SchemaValidator};
use garden_cache::protocol::handle_line;
use garden_cache::{ContentCache, ContentError, ContentKey, EntryStore};
use tempfile::TempDir;

const TTL: Duration = Duration::from_secs(300);

// == Helper Functions ==

fn write_page(root: &Path, key: &str, title: &str) {
    write_raw(
        root,
        key,
        &format!("---\ntitle: {}\ndate: 2024-02-10\ntags: [Garden, notes]\n---\n# {}\n", title, title),
    );
}

fn write_raw(root: &Path, key: &str, text: &str) {
    let path = root.join(format!("{}.md", key));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

fn create_cache(capacity: usize) -> (TempDir, ContentCache, Arc<ManualClock>) {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new());
    let store = EntryStore::with_clock(NonZeroUsize::new(capacity).unwrap(), TTL, clock.clone());
    let cache = ContentCache::new(FsLoader::new(dir.path()), SchemaValidator::new(), store);
    (dir, cache, clock)
}

fn key(k: &str) -> ContentKey {
    ContentKey::new(k)
}

// == Freshness ==

#[test]
fn test_cached_until_ttl_then_reloaded() {
    let (dir, cache, clock) = create_cache(10);
    write_page(dir.path(), "page1", "Original");

    assert_eq!(cache.get(&key("page1")).unwrap().title(), "Original");
    write_page(dir.path(), "page1", "Edited");

    clock.set_elapsed(Duration::from_secs(299));
    assert_eq!(cache.get(&key("page1")).unwrap().title(), "Original");
    assert_eq!(cache.stats().loads, 1);

    clock.set_elapsed(Duration::from_secs(301));
    assert_eq!(cache.get(&key("page1")).unwrap().title(), "Edited");
    assert_eq!(cache.stats().loads, 2);
    assert_eq!(cache.stats().store.expirations, 1);
}

#[test]
fn test_same_record_returned_within_ttl() {
    let (dir, cache, clock) = create_cache(10);
    write_page(dir.path(), "page1", "Shared");

    let first = cache.get(&key("page1")).unwrap();
    clock.advance(Duration::from_secs(120));
    let second = cache.get(&key("page1")).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

// == Capacity and Recency ==

#[test]
fn test_capacity_two_evicts_least_recently_used() {
    let (dir, cache, _) = create_cache(2);
    for name in ["a", "b", "c"] {
        write_page(dir.path(), name, name);
    }

    cache.get(&key("a")).unwrap();
    cache.get(&key("b")).unwrap();
    assert_eq!(cache.store().keys_by_recency(), vec![key("b"), key("a")]);

    cache.get(&key("a")).unwrap();
    assert_eq!(cache.store().keys_by_recency(), vec![key("a"), key("b")]);

    cache.get(&key("c")).unwrap();
    assert_eq!(cache.store().keys_by_recency(), vec![key("c"), key("a")]);
    assert_eq!(cache.stats().store.evictions, 1);

    let loads_before = cache.stats().loads;
    cache.get(&key("b")).unwrap();
    assert_eq!(cache.stats().loads, loads_before + 1, "evicted key must reload");
    assert_eq!(cache.store().len(), 2);
}

// == Failure Handling ==

#[test]
fn test_missing_content_is_not_found() {
    let (_dir, cache, _) = create_cache(10);

    let err = cache.get(&key("nowhere")).unwrap_err();
    assert!(matches!(err, ContentError::NotFound(ref k) if k.as_str() == "nowhere"));
    assert!(cache.store().is_empty());
}

#[test]
fn test_keys_escaping_root_are_not_found() {
    let (dir, cache, _) = create_cache(10);
    write_page(dir.path(), "secret", "Secret");

    let err = cache.get(&key("../secret")).unwrap_err();
    assert!(matches!(err, ContentError::NotFound(_)));
}

#[test]
fn test_invalid_content_never_poisons_cache() {
    let (dir, cache, _) = create_cache(10);
    write_raw(dir.path(), "draft", "---\ntitle: \"\"\ndate: 2024-13-01\n---\nbody");

    for _ in 0..2 {
        match cache.get(&key("draft")).unwrap_err() {
            ContentError::InvalidContent { violations, .. } => {
                let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["title", "date"]);
            }
            other => panic!("expected invalid content, got {other:?}"),
        }
        assert!(cache.store().is_empty());
    }
    assert_eq!(cache.stats().loads, 2, "each failed get retries the load");

    write_page(dir.path(), "draft", "Fixed");
    assert_eq!(cache.get(&key("draft")).unwrap().title(), "Fixed");
}

#[test]
fn test_unterminated_frontmatter_is_invalid() {
    let (dir, cache, _) = create_cache(10);
    write_raw(dir.path(), "cut", "---\ntitle: Cut\ndate: 2024-01-01\n");

    let err = cache.get(&key("cut")).unwrap_err();
    assert_eq!(err.kind(), "invalid_content");
}

// == Invalidation ==

#[test]
fn test_path_aliases_share_one_entry() {
    let (dir, cache, _) = create_cache(10);
    write_page(dir.path(), "notes/rust", "v1");

    for alias in ["notes/rust", "notes//rust", "notes/./rust"] {
        assert_eq!(cache.get(&key(alias)).unwrap().title(), "v1");
    }
    assert_eq!(cache.store().len(), 1);
    assert_eq!(cache.stats().loads, 1);

    write_page(dir.path(), "notes/rust", "v2");
    assert!(cache.invalidate(&key("notes/rust")));
    assert!(cache.store().is_empty());

    for alias in ["notes//rust", "notes/./rust"] {
        assert_eq!(cache.get(&key(alias)).unwrap().title(), "v2");
    }
    assert_eq!(cache.store().len(), 1);
}

#[test]
fn test_invalidate_is_idempotent_and_forces_reload() {
    let (dir, cache, _) = create_cache(10);
    write_page(dir.path(), "page1", "v1");

    assert!(!cache.invalidate(&key("page1")));

    cache.get(&key("page1")).unwrap();
    write_page(dir.path(), "page1", "v2");
    assert!(cache.invalidate(&key("page1")));
    assert!(!cache.invalidate(&key("page1")));

    assert_eq!(cache.get(&key("page1")).unwrap().title(), "v2");
}

#[test]
fn test_invalidate_all_then_reload() {
    let (dir, cache, _) = create_cache(10);
    write_page(dir.path(), "notes/rust", "Rust");
    write_page(dir.path(), "notes/yaml", "YAML");

    let rust = cache.get(&key("notes/rust")).unwrap();
    assert!(rust.has_tag("garden"));
    cache.get(&key("notes/yaml.md")).unwrap();

    assert_eq!(cache.invalidate_all(), 2);
    assert!(cache.store().is_empty());
    assert_eq!(cache.invalidate_all(), 0);
}

// == Concurrency ==

#[test]
fn test_concurrent_gets_share_one_store() {
    let (dir, cache, _) = create_cache(8);
    for i in 0..16 {
        write_page(dir.path(), &format!("page{}", i), &format!("Page {}", i));
    }
    let cache = Arc::new(cache);

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for round in 0..50 {
                    let n = (worker * 7 + round) % 16;
                    let record = cache.get(&key(&format!("page{}", n))).unwrap();
                    assert_eq!(record.title(), format!("Page {}", n));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let stats = cache.stats();
    assert!(cache.store().len() <= 8);
    assert_eq!(stats.store.hits + stats.store.misses, 8 * 50);
    assert_eq!(stats.load_failures, 0);
}

#[tokio::test]
async fn test_protocol_lines_from_async_tasks() {
    let (dir, cache, _) = create_cache(4);
    write_page(dir.path(), "hello", "Hello");
    let cache = Arc::new(cache);

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            tokio::task::spawn_blocking(move || {
                handle_line(&cache, "get hello").map(|r| r.to_json_line())
            })
        })
        .collect();

    for task in tasks {
        let line = task.await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["record"]["frontmatter"]["tags"][0], "garden");
    }
    assert_eq!(cache.stats().store.total_entries, 1);
}
