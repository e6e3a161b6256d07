use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use anyhow::{Result, bail};
use witmap_catalog::{CatalogFetcher, CatalogSource, FieldCatalogCache};
use witmap_model::{DiagnosticKind, FieldDefinition, FieldValueType};

/// Fetcher that counts calls and can be switched offline.
#[derive(Default)]
struct CountingFetcher {
    calls: AtomicUsize,
    offline: AtomicBool,
}

impl CountingFetcher {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

impl CatalogFetcher for CountingFetcher {
    fn fetch_field_catalog(&self, project: &str, item_type: &str) -> Result<Vec<FieldDefinition>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            bail!("connection refused");
        }
        Ok(vec![
            FieldDefinition::new("System.Title", "Title", FieldValueType::String)
                .with_required(true),
            FieldDefinition::new(
                format!("Custom.{project}Owner"),
                format!("{item_type} Owner"),
                FieldValueType::String,
            ),
        ])
    }
}

fn cache() -> (Arc<CountingFetcher>, FieldCatalogCache) {
    let fetcher = Arc::new(CountingFetcher::default());
    let cache = FieldCatalogCache::from_shared(fetcher.clone());
    (fetcher, cache)
}

#[test]
fn fetches_once_per_key() {
    let (fetcher, cache) = cache();

    let first = cache.get("Web", "Test Case");
    let second = cache.get("Web", "Test Case");

    assert_eq!(first.source, CatalogSource::Fetched);
    assert_eq!(second.source, CatalogSource::Cached);
    assert_eq!(first.fields, second.fields);
    assert_eq!(fetcher.calls(), 1);

    cache.get("Web", "Bug");
    cache.get("Mobile", "Test Case");
    assert_eq!(fetcher.calls(), 3);
    assert_eq!(cache.len(), 3);
}

#[test]
fn keys_are_case_sensitive() {
    let (fetcher, cache) = cache();
    cache.get("Web", "Bug");
    cache.get("web", "bug");
    assert_eq!(fetcher.calls(), 2);
}

#[test]
fn invalidate_one_key_or_everything() {
    let (fetcher, cache) = cache();
    cache.get("Web", "Bug");
    cache.get("Web", "Test Case");

    assert_eq!(cache.invalidate(Some("Web"), Some("Bug")), 1);
    assert!(!cache.contains("Web", "Bug"));
    assert!(cache.contains("Web", "Test Case"));

    cache.get("Web", "Bug");
    assert_eq!(fetcher.calls(), 3);

    // A partial key clears the whole cache.
    assert_eq!(cache.invalidate(Some("Web"), None), 2);
    assert!(cache.is_empty());
    assert_eq!(cache.invalidate(None, None), 0);
}

#[test]
fn failed_fetch_returns_fallback_and_is_retried() {
    let (fetcher, cache) = cache();
    fetcher.set_offline(true);

    let lookup = cache.get("Web", "Test Case");
    assert_eq!(lookup.source, CatalogSource::Fallback);
    assert!(lookup.fields.iter().any(|f| f.reference_name == "System.Title"));
    let warning = lookup.warning.expect("degraded warning");
    assert_eq!(warning.kind, DiagnosticKind::SchemaFetchDegraded);
    assert!(warning.message.contains("Web/Test Case"));
    assert!(!cache.contains("Web", "Test Case"));

    fetcher.set_offline(false);
    let lookup = cache.get("Web", "Test Case");
    assert_eq!(lookup.source, CatalogSource::Fetched);
    assert!(lookup.warning.is_none());
    assert_eq!(fetcher.calls(), 2);
}

#[test]
fn get_cached_catalog_returns_fields() {
    let (_, cache) = cache();
    let fields = cache.get_cached_catalog("Web", "Bug");
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[1].display_name, "Bug Owner");
}

#[test]
fn clones_share_entries_across_threads() {
    let (fetcher, cache) = cache();
    cache.get("Web", "Bug");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            thread::spawn(move || cache.get("Web", "Bug").source)
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().expect("thread"), CatalogSource::Cached);
    }
    assert_eq!(fetcher.calls(), 1);
}

#[test]
fn closures_are_fetchers() {
    let cache = FieldCatalogCache::new(
        |project: &str, _: &str| -> Result<Vec<FieldDefinition>> {
            Ok(vec![FieldDefinition::new(
                "System.Title",
                project,
                FieldValueType::String,
            )])
        },
    );
    assert_eq!(cache.get_cached_catalog("Web", "Bug")[0].display_name, "Web");
}
