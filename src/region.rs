//! Cache region: a named, independently configured slice of the cache.

use crate::client::CacheClient;
use crate::config::RegionSettings;
use crate::error::{Error, Result};
use crate::key::KeyStrategy;
use crate::observability::CacheMetrics;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything a region needs, assembled by the provider.
///
/// Regions are built whole from this — there is no partially configured
/// region state to observe.
pub struct RegionConfig<C> {
    pub name: String,
    pub client: Arc<C>,
    pub settings: RegionSettings,
    pub key_strategy: Arc<dyn KeyStrategy>,
    pub metrics: Arc<dyn CacheMetrics>,
}

/// A named cache region sharing the provider's client handle.
///
/// Values are opaque byte blobs; whatever serialization the caller wants
/// happens outside. Logical keys are namespaced per region, so two regions
/// never collide even when callers reuse key text.
///
/// When clear support is enabled, the region keeps a clear-index counter in
/// the backing store and folds it into every physical key; `clear` bumps
/// the counter, orphaning all prior entries at once. The counter read adds
/// a store round trip to every keyed operation, which is the price of
/// `clear` on stores that cannot enumerate keys.
pub struct CacheRegion<C: CacheClient> {
    name: String,
    client: Arc<C>,
    cache_time: Duration,
    clear_supported: bool,
    key_strategy: Arc<dyn KeyStrategy>,
    metrics: Arc<dyn CacheMetrics>,
}

impl<C: CacheClient> fmt::Debug for CacheRegion<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheRegion")
            .field("name", &self.name)
            .field("cache_time", &self.cache_time)
            .field("clear_supported", &self.clear_supported)
            .finish_non_exhaustive()
    }
}

impl<C: CacheClient> CacheRegion<C> {
    /// Assemble a region from its resolved configuration.
    pub fn new(config: RegionConfig<C>) -> Self {
        let cache_time = config.settings.cache_time();
        CacheRegion {
            name: config.name,
            client: config.client,
            cache_time,
            clear_supported: config.settings.clear_supported,
            key_strategy: config.key_strategy,
            metrics: config.metrics,
        }
    }

    /// Region name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved entry TTL.
    pub fn cache_time(&self) -> Duration {
        self.cache_time
    }

    /// Whether `clear` is honored.
    pub fn clear_supported(&self) -> bool {
        self.clear_supported
    }

    /// Fetch the value cached under `key`.
    ///
    /// # Errors
    /// Returns `Err` if the backing store fails.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let timer = Instant::now();
        let physical_key = self.physical_key(key).await?;

        match self.client.get(&physical_key).await {
            Ok(Some(bytes)) => {
                debug!("✓ Region {} GET {} -> HIT", self.name, key);
                self.metrics.record_hit(&self.name, timer.elapsed());
                Ok(Some(bytes))
            }
            Ok(None) => {
                debug!("✓ Region {} GET {} -> MISS", self.name, key);
                self.metrics.record_miss(&self.name, timer.elapsed());
                Ok(None)
            }
            Err(e) => {
                self.metrics.record_error(&self.name, &e.to_string());
                Err(e)
            }
        }
    }

    /// Cache `value` under `key` with the region's TTL.
    ///
    /// A resolved `cache_time_seconds` of 0 stores without expiry.
    ///
    /// # Errors
    /// Returns `Err` if the backing store fails.
    pub async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let timer = Instant::now();
        let physical_key = self.physical_key(key).await?;
        let ttl = (self.cache_time > Duration::ZERO).then_some(self.cache_time);

        match self.client.set(&physical_key, value, ttl).await {
            Ok(()) => {
                debug!("✓ Region {} SET {}", self.name, key);
                self.metrics.record_set(&self.name, timer.elapsed());
                Ok(())
            }
            Err(e) => {
                self.metrics.record_error(&self.name, &e.to_string());
                Err(e)
            }
        }
    }

    /// Drop the value cached under `key`.
    ///
    /// # Errors
    /// Returns `Err` if the backing store fails.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let timer = Instant::now();
        let physical_key = self.physical_key(key).await?;

        match self.client.delete(&physical_key).await {
            Ok(()) => {
                debug!("✓ Region {} DELETE {}", self.name, key);
                self.metrics.record_delete(&self.name, timer.elapsed());
                Ok(())
            }
            Err(e) => {
                self.metrics.record_error(&self.name, &e.to_string());
                Err(e)
            }
        }
    }

    /// Invalidate every entry in the region by bumping the clear index.
    ///
    /// Orphaned entries are left to expire; the backing store reclaims
    /// them.
    ///
    /// # Errors
    /// Returns `Error::ClearNotSupported` when clear support is disabled
    /// for this region, or `Err` if the backing store fails.
    pub async fn clear(&self) -> Result<()> {
        if !self.clear_supported {
            return Err(Error::ClearNotSupported(self.name.clone()));
        }

        let index = self.clear_index().await?;
        let next = index + 1;
        self.client
            .set(
                &self.index_key(),
                next.to_string().into_bytes(),
                None,
            )
            .await?;

        info!("✓ Region {} cleared (index {} -> {})", self.name, index, next);
        Ok(())
    }

    /// Physical key for `key`: region name and clear index folded in, then
    /// run through the key strategy.
    async fn physical_key(&self, key: &str) -> Result<String> {
        let index = self.clear_index().await?;
        let raw = format!("{}:{}:{}", self.name, index, key);
        Ok(self.key_strategy.generate_key(&raw))
    }

    async fn clear_index(&self) -> Result<u64> {
        if !self.clear_supported {
            // Without clear support the index never moves; skip the lookup.
            return Ok(0);
        }

        let index = self
            .client
            .get(&self.index_key())
            .await?
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .and_then(|text| text.parse().ok())
            .unwrap_or(0);
        Ok(index)
    }

    fn index_key(&self) -> String {
        format!("{}:index_key", self.name)
    }
}
