//! Integration tests for icon resolution and caching
//!
//! These tests validate the identifier-keyed cache lifecycle: extraction on
//! first resolution, reuse on every later one, soft-fail behavior, and the
//! append-only nature of the cache directory.

mod common;

use applist::registry::{AppDescriptor, PackageRegistry};
use applist::IconCache;
use common::FakeRegistry;
use std::sync::atomic::Ordering;
use tempfile::TempDir;

fn cache_over(icon_size: u32) -> (TempDir, IconCache) {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let cache =
        IconCache::new(tmp.path().join("app_icons"), icon_size).expect("Failed to create cache");
    (tmp, cache)
}

#[test]
fn resolve_extracts_and_writes_png_once() {
    let (_tmp, cache) = cache_over(32);
    let registry = FakeRegistry::single_strategy(Vec::new());
    let descriptor = AppDescriptor::new("com.example.app");

    let path = cache.resolve(&registry, &descriptor).expect("icon path");
    assert!(path.is_file(), "cache file must exist after resolution");
    assert!(path.ends_with("com.example.app.png"));
    assert_eq!(registry.icon_renders.load(Ordering::SeqCst), 1);
}

#[test]
fn second_resolution_reuses_cached_file() {
    let (_tmp, cache) = cache_over(32);
    let registry = FakeRegistry::single_strategy(Vec::new());
    let descriptor = AppDescriptor::new("com.example.app");

    let first = cache.resolve(&registry, &descriptor).expect("icon path");
    let second = cache.resolve(&registry, &descriptor).expect("icon path");

    assert_eq!(first, second, "same deterministic path both times");
    assert_eq!(
        registry.icon_renders.load(Ordering::SeqCst),
        1,
        "second call must not re-extract"
    );
}

#[test]
fn preexisting_file_short_circuits_extraction() {
    let (_tmp, cache) = cache_over(32);
    let registry = FakeRegistry::single_strategy(Vec::new());
    let descriptor = AppDescriptor::new("com.example.app");

    // Seed the cache path directly; content is never inspected or refreshed
    let seeded = cache.cache_path("com.example.app");
    std::fs::write(&seeded, b"stale bytes").unwrap();

    let path = cache.resolve(&registry, &descriptor).expect("icon path");
    assert_eq!(path, seeded);
    assert_eq!(
        registry.icon_renders.load(Ordering::SeqCst),
        0,
        "existing file must be returned without extraction"
    );
    assert_eq!(std::fs::read(&seeded).unwrap(), b"stale bytes");
}

#[test]
fn cached_icon_is_resized_to_configured_edge() {
    let (_tmp, cache) = cache_over(16);
    let registry = FakeRegistry::single_strategy(Vec::new());
    let descriptor = AppDescriptor::new("com.example.app");

    // FakeRegistry renders 8x8; the cache must store 16x16
    let path = cache.resolve(&registry, &descriptor).expect("icon path");
    let img = image::open(&path).expect("cache file must be decodable PNG");
    assert_eq!((img.width(), img.height()), (16, 16));
}

#[test]
fn extraction_failure_soft_fails_to_none() {
    let (_tmp, cache) = cache_over(32);
    let registry =
        FakeRegistry::single_strategy(Vec::new()).with_broken_icon("com.broken.app");
    let descriptor = AppDescriptor::new("com.broken.app");

    assert_eq!(cache.resolve(&registry, &descriptor), None);
    assert!(
        !cache.cache_path("com.broken.app").exists(),
        "failed extraction must not leave a cache file"
    );
}

#[test]
fn unsafe_identifier_soft_fails_without_touching_disk() {
    let (tmp, cache) = cache_over(32);
    let registry = FakeRegistry::single_strategy(Vec::new());
    let descriptor = AppDescriptor::new("../escape");

    assert_eq!(cache.resolve(&registry, &descriptor), None);
    assert_eq!(registry.icon_renders.load(Ordering::SeqCst), 0);
    assert!(!tmp.path().join("escape.png").exists());
}

#[test]
fn stats_reflect_resolved_icons() {
    let (_tmp, cache) = cache_over(32);
    let registry = FakeRegistry::single_strategy(Vec::new());

    for identifier in ["com.example.one", "com.example.two", "com.example.three"] {
        cache
            .resolve(&registry, &AppDescriptor::new(identifier))
            .expect("icon path");
    }

    let stats = cache.stats().unwrap();
    assert_eq!(stats.count, 3);
    assert!(stats.size_bytes > 0);
}

#[test]
fn distinct_identifiers_get_distinct_files() {
    let (_tmp, cache) = cache_over(32);
    let registry = FakeRegistry::single_strategy(Vec::new());

    let a = cache
        .resolve(&registry, &AppDescriptor::new("com.example.a"))
        .unwrap();
    let b = cache
        .resolve(&registry, &AppDescriptor::new("com.example.b"))
        .unwrap();
    assert_ne!(a, b);
    assert!(a.is_file() && b.is_file());
}
