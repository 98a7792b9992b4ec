//! Metrics collection hooks for region operations.
//!
//! Implement [`CacheMetrics`] to feed hits, misses and failures into your
//! monitoring system; the default trait bodies log through the `log`
//! crate, and [`NoOpMetrics`] silences everything.
//!
//! ```ignore
//! use cache_regions::observability::CacheMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl CacheMetrics for PrometheusMetrics {
//!     fn record_hit(&self, _region: &str, _duration: Duration) {
//!         // counter!("cache_hits").inc();
//!     }
//!     // ... other methods as needed
//! }
//!
//! // let provider = RegionCacheProvider::new(factory)
//! //     .with_metrics(Arc::new(PrometheusMetrics));
//! ```

use std::time::Duration;

/// Trait for cache metrics collection.
///
/// All hooks receive the region name; timing covers the full backing-store
/// round trip, clear-index lookup included.
pub trait CacheMetrics: Send + Sync {
    /// Record a cache hit.
    fn record_hit(&self, region: &str, duration: Duration) {
        debug!("Cache HIT in {} took {:?}", region, duration);
    }

    /// Record a cache miss.
    fn record_miss(&self, region: &str, duration: Duration) {
        debug!("Cache MISS in {} took {:?}", region, duration);
    }

    /// Record a cache put.
    fn record_set(&self, region: &str, duration: Duration) {
        debug!("Cache SET in {} took {:?}", region, duration);
    }

    /// Record a cache delete.
    fn record_delete(&self, region: &str, duration: Duration) {
        debug!("Cache DELETE in {} took {:?}", region, duration);
    }

    /// Record an error.
    fn record_error(&self, region: &str, error: &str) {
        warn!("Cache ERROR in {}: {}", region, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _region: &str, _duration: Duration) {}
    fn record_miss(&self, _region: &str, _duration: Duration) {}
    fn record_set(&self, _region: &str, _duration: Duration) {}
    fn record_delete(&self, _region: &str, _duration: Duration) {}
    fn record_error(&self, _region: &str, _error: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_metrics() {
        let metrics = NoOpMetrics;
        metrics.record_hit("users", Duration::from_secs(1));
        metrics.record_miss("users", Duration::from_secs(2));
        metrics.record_error("users", "boom");
    }
}
