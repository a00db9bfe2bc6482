//! # Catalogue Collaborators
//!
//! Implementations of the core's [`Catalogue`] lookup seam: a plain
//! in-memory catalogue and a TTL cache to wrap a slower source.
//!
//! ## Why an Explicit Cache Object?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      TTL-Cached Lookup                                  │
//! │                                                                         │
//! │  get_product(sku)                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  entry for sku, fetched less than TTL ago? ──yes──► cached clone       │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  inner.get_product(sku) ──► cache (hit OR miss) ──► return             │
//! │                                                                         │
//! │  The cache is an owned object with an injected Clock - no              │
//! │  module-level mutable state, and tests drive expiry by advancing       │
//! │  a manual clock instead of sleeping.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Negative lookups are cached too: a SKU the source doesn't know stays
//! unknown for one TTL instead of hammering the source on every
//! keystroke.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use meridian_core::{Catalogue, CatalogueItem};

// =============================================================================
// Clock
// =============================================================================

/// Injected time source for the cache.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The real clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// =============================================================================
// In-Memory Catalogue
// =============================================================================

/// A catalogue backed by a plain map. Used directly in tests and as the
/// seeded catalogue of a standalone register.
#[derive(Debug, Default)]
pub struct MemoryCatalogue {
    items: HashMap<String, CatalogueItem>,
}

impl MemoryCatalogue {
    /// Creates an empty catalogue.
    pub fn new() -> Self {
        MemoryCatalogue::default()
    }

    /// Creates a catalogue from a list of items, keyed by SKU.
    pub fn from_items(items: Vec<CatalogueItem>) -> Self {
        MemoryCatalogue {
            items: items.into_iter().map(|i| (i.sku.clone(), i)).collect(),
        }
    }

    /// Inserts (or replaces) an item.
    pub fn insert(&mut self, item: CatalogueItem) {
        self.items.insert(item.sku.clone(), item);
    }
}

impl Catalogue for MemoryCatalogue {
    fn get_product(&self, sku: &str) -> Option<CatalogueItem> {
        self.items.get(sku).cloned()
    }
}

// =============================================================================
// TTL-Cached Catalogue
// =============================================================================

/// Default time-to-live for cached lookups.
pub const DEFAULT_CATALOGUE_TTL: Duration = Duration::from_secs(60);

/// One cached lookup result (`None` = the source didn't know the SKU).
#[derive(Debug, Clone)]
struct CacheEntry {
    item: Option<CatalogueItem>,
    fetched_at: Instant,
}

/// A per-SKU TTL cache over another catalogue.
pub struct CachedCatalogue<C: Catalogue> {
    inner: C,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl<C: Catalogue> CachedCatalogue<C> {
    /// Wraps a catalogue with the default TTL and the system clock.
    pub fn new(inner: C) -> Self {
        Self::with_clock(inner, DEFAULT_CATALOGUE_TTL, Arc::new(SystemClock))
    }

    /// Wraps a catalogue with an explicit TTL and clock.
    pub fn with_clock(inner: C, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        CachedCatalogue {
            inner,
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Drops every cached entry.
    pub fn invalidate_all(&self) {
        self.entries
            .lock()
            .expect("catalogue cache mutex poisoned")
            .clear();
    }
}

impl<C: Catalogue> Catalogue for CachedCatalogue<C> {
    fn get_product(&self, sku: &str) -> Option<CatalogueItem> {
        let now = self.clock.now();

        let mut entries = self.entries.lock().expect("catalogue cache mutex poisoned");
        if let Some(entry) = entries.get(sku) {
            if now.duration_since(entry.fetched_at) < self.ttl {
                return entry.item.clone();
            }
        }

        let item = self.inner.get_product(sku);
        entries.insert(
            sku.to_string(),
            CacheEntry {
                item: item.clone(),
                fetched_at: now,
            },
        );
        item
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::{Money, StockInfo, StockStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn item(sku: &str) -> CatalogueItem {
        CatalogueItem {
            sku: sku.to_string(),
            name: format!("Product {}", sku),
            price: Money::from_cents(199900),
            stock: StockInfo {
                status: StockStatus::InStock,
                quantity: 10,
                lead_time_text: None,
            },
            colours: Vec::new(),
        }
    }

    /// Counts how often the wrapped source is actually hit.
    struct CountingCatalogue {
        inner: MemoryCatalogue,
        fetches: AtomicUsize,
    }

    impl Catalogue for CountingCatalogue {
        fn get_product(&self, sku: &str) -> Option<CatalogueItem> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.get_product(sku)
        }
    }

    /// Manually advanced clock.
    struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(ManualClock {
                now: Mutex::new(Instant::now()),
            })
        }

        fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
    }

    fn cached(
        items: Vec<CatalogueItem>,
        ttl: Duration,
        clock: Arc<ManualClock>,
    ) -> CachedCatalogue<CountingCatalogue> {
        CachedCatalogue::with_clock(
            CountingCatalogue {
                inner: MemoryCatalogue::from_items(items),
                fetches: AtomicUsize::new(0),
            },
            ttl,
            clock,
        )
    }

    #[test]
    fn test_memory_catalogue_lookup() {
        let cat = MemoryCatalogue::from_items(vec![item("DT-1001")]);
        assert!(cat.get_product("DT-1001").is_some());
        assert!(cat.get_product("DT-9999").is_none());
    }

    #[test]
    fn test_cache_serves_repeat_lookups() {
        let clock = ManualClock::new();
        let cat = cached(vec![item("DT-1001")], Duration::from_secs(60), clock);

        for _ in 0..5 {
            assert!(cat.get_product("DT-1001").is_some());
        }
        assert_eq!(cat.inner.fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cache_refetches_after_ttl() {
        let clock = ManualClock::new();
        let cat = cached(
            vec![item("DT-1001")],
            Duration::from_secs(60),
            clock.clone(),
        );

        cat.get_product("DT-1001");
        clock.advance(Duration::from_secs(61));
        cat.get_product("DT-1001");

        assert_eq!(cat.inner.fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cache_caches_negative_lookups() {
        let clock = ManualClock::new();
        let cat = cached(Vec::new(), Duration::from_secs(60), clock);

        assert!(cat.get_product("DT-9999").is_none());
        assert!(cat.get_product("DT-9999").is_none());
        assert_eq!(cat.inner.fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalidate_all_forces_refetch() {
        let clock = ManualClock::new();
        let cat = cached(vec![item("DT-1001")], Duration::from_secs(60), clock);

        cat.get_product("DT-1001");
        cat.invalidate_all();
        cat.get_product("DT-1001");

        assert_eq!(cat.inner.fetches.load(Ordering::SeqCst), 2);
    }
}
