//! Benchmarks for icon cache resolution
//!
//! Measures the two paths a resolution can take: the cache hit (path
//! existence check only) and the full extract-resize-encode-persist miss.

#![allow(missing_docs)]

use applist::registry::{
    AppDescriptor, IconBitmap, MatchFlags, PackageRegistry, RegistryError,
};
use applist::IconCache;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Registry rendering a fixed 64x64 gradient bitmap for every identifier
struct BitmapRegistry;

impl PackageRegistry for BitmapRegistry {
    fn capabilities(&self) -> MatchFlags {
        MatchFlags::METADATA
    }

    fn installed_applications(
        &self,
        _flags: MatchFlags,
    ) -> Result<Vec<AppDescriptor>, RegistryError> {
        Ok(Vec::new())
    }

    fn launchable_entry_points(&self) -> Result<Vec<AppDescriptor>, RegistryError> {
        Ok(Vec::new())
    }

    fn display_label(&self, descriptor: &AppDescriptor) -> Result<String, RegistryError> {
        Ok(descriptor.identifier.clone())
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "benchmark utility: modulo 256 ensures value fits in u8"
    )]
    fn icon_bitmap(&self, _descriptor: &AppDescriptor) -> Result<IconBitmap, RegistryError> {
        // Gradient pattern prevents unrealistic PNG compression
        let mut rgba = vec![0u8; 64 * 64 * 4];
        for (i, byte) in rgba.iter_mut().enumerate() {
            *byte = (i % 256) as u8;
        }
        Ok(IconBitmap {
            width: 64,
            height: 64,
            rgba,
        })
    }
}

fn bench_cache_hit(c: &mut Criterion) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let cache = IconCache::new(tmp.path(), 32).expect("Failed to create cache");
    let registry = BitmapRegistry;
    let descriptor = AppDescriptor::new("com.example.cached");

    // Populate once; every benchmark iteration is a pure hit
    cache
        .resolve(&registry, &descriptor)
        .expect("initial resolution should succeed");

    c.bench_function("icon_cache_hit", |b| {
        b.iter(|| black_box(cache.resolve(&registry, &descriptor)));
    });
}

fn bench_extract_and_store(c: &mut Criterion) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let cache = IconCache::new(tmp.path(), 32).expect("Failed to create cache");
    let registry = BitmapRegistry;
    let counter = AtomicUsize::new(0);

    c.bench_function("icon_cache_extract_and_store", |b| {
        b.iter(|| {
            // Fresh identifier per iteration forces the miss path
            let n = counter.fetch_add(1, Ordering::Relaxed);
            let descriptor = AppDescriptor::new(format!("com.example.app{n}"));
            black_box(cache.resolve(&registry, &descriptor))
        });
    });
}

criterion_group!(benches, bench_cache_hit, bench_extract_and_store);
criterion_main!(benches);
