//! Cache region provider - lifecycle owner and region factory.

use crate::client::{CacheClient, ClientFactory};
use crate::config::{CacheProperties, RegionSettings};
use crate::error::{Error, Result};
use crate::key::{DefaultKeyStrategy, KeyStrategy, StrategyRegistry};
use crate::observability::{CacheMetrics, NoOpMetrics};
use crate::region::{CacheRegion, RegionConfig};
use crate::timestamp::Timestamper;
use std::sync::Arc;

/// Process-wide entry point: owns the shared client handle and builds
/// cache regions against it.
///
/// # Lifecycle
///
/// `start` creates the one client via the injected factory; `build_cache`
/// hands out regions that share it; `stop` releases it. `start` and `stop`
/// take `&mut self`, so the compiler rejects a `build_cache` racing either
/// one — the ordering contract the host must uphold is enforced by the
/// borrow checker instead of a lock. Regions built before a `stop` keep
/// their own `Arc` to the client; once it is shut down their operations
/// fail with a backend error rather than touching a dangling reference.
///
/// # Example
///
/// ```
/// use cache_regions::{CacheProperties, InMemoryClientFactory, RegionCacheProvider};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> cache_regions::error::Result<()> {
/// let props = CacheProperties::new()
///     .set("cache.users.cache_time_seconds", "60");
///
/// let mut provider = RegionCacheProvider::new(InMemoryClientFactory);
/// provider.start(&props).await?;
///
/// let users = provider.build_cache("users", &props)?;
/// users.put("42", b"alice".to_vec()).await?;
///
/// provider.stop().await;
/// # Ok(())
/// # }
/// ```
pub struct RegionCacheProvider<F: ClientFactory> {
    factory: F,
    client: Option<Arc<F::Client>>,
    strategies: StrategyRegistry,
    metrics: Arc<dyn CacheMetrics>,
    timestamper: Timestamper,
}

impl<F: ClientFactory> RegionCacheProvider<F> {
    /// Create an unstarted provider around `factory`.
    ///
    /// The strategy registry starts with the built-ins registered.
    pub fn new(factory: F) -> Self {
        RegionCacheProvider {
            factory,
            client: None,
            strategies: StrategyRegistry::with_builtins(),
            metrics: Arc::new(NoOpMetrics),
            timestamper: Timestamper::new(),
        }
    }

    /// Set a custom metrics handler, shared by every region built after.
    pub fn with_metrics(mut self, metrics: Arc<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// The strategy registry, for lookups.
    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    /// The strategy registry, for registering custom strategies before
    /// regions are built.
    pub fn strategies_mut(&mut self) -> &mut StrategyRegistry {
        &mut self.strategies
    }

    /// Whether a live client handle is held.
    pub fn is_started(&self) -> bool {
        self.client.is_some()
    }

    /// Create the shared client from `props` via the injected factory.
    ///
    /// Expected to be called once per provider, before any `build_cache`.
    /// Calling it again replaces the handle without shutting the previous
    /// one down; regions built against the old handle keep working through
    /// their own reference.
    ///
    /// # Errors
    /// Returns `Error::Initialization` wrapping whatever the factory
    /// failed with. The provider stays unstarted, so the caller may retry.
    pub async fn start(&mut self, props: &CacheProperties) -> Result<()> {
        let client = self
            .factory
            .create(props)
            .await
            .map_err(Error::Initialization)?;

        self.client = Some(Arc::new(client));
        info!("✓ Cache provider started");
        Ok(())
    }

    /// Shut down the shared client and drop the handle.
    ///
    /// Best-effort: shutdown failures are the client's to log. Calling
    /// `stop` on an unstarted (or already stopped) provider is a no-op.
    pub async fn stop(&mut self) {
        if let Some(client) = self.client.take() {
            debug!("Shutting down cache client");
            client.shutdown().await;
        }
    }

    /// Build an independently configured region named `region_name`.
    ///
    /// Resolves the region's policy from `props` (see
    /// [`RegionSettings::resolve`] for the lookup orders), instantiates the
    /// configured key strategy, and binds the new region to the shared
    /// client. Every call produces a fresh region object — the provider
    /// does not deduplicate by name; hosts call once per region.
    ///
    /// # Errors
    /// - `Error::ProviderNotStarted` - no live client handle (`start` has
    ///   not succeeded, or `stop` ran)
    /// - `Error::InvalidProperty` - a consulted property failed to parse
    /// - `Error::StrategyInstantiation` - the resolved strategy identifier
    ///   is unknown or its constructor failed; other regions are unaffected
    pub fn build_cache(
        &self,
        region_name: &str,
        props: &CacheProperties,
    ) -> Result<CacheRegion<F::Client>> {
        let client = self
            .client
            .as_ref()
            .map(Arc::clone)
            .ok_or(Error::ProviderNotStarted)?;

        let settings = RegionSettings::resolve(region_name, props)?;

        let key_strategy: Arc<dyn KeyStrategy> = match &settings.key_strategy {
            Some(name) => {
                let strategy = self.strategies.instantiate(name)?;
                debug!("Using key strategy {:?} for region {}", name, region_name);
                strategy
            }
            None => Arc::new(DefaultKeyStrategy),
        };

        info!(
            "✓ Built cache region {} (TTL: {}s, clear supported: {})",
            region_name, settings.cache_time_seconds, settings.clear_supported
        );

        Ok(CacheRegion::new(RegionConfig {
            name: region_name.to_string(),
            client,
            settings,
            key_strategy,
            metrics: Arc::clone(&self.metrics),
        }))
    }

    /// Next entry-versioning timestamp, strictly increasing.
    pub fn next_timestamp(&self) -> i64 {
        self.timestamper.next()
    }

    /// Capability flag advertised to the host: minimal puts are not the
    /// default for this provider.
    pub fn is_minimal_puts_enabled_by_default(&self) -> bool {
        false
    }
}
