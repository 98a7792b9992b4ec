//! Shared client handle and factory abstractions.
//!
//! One client is created at provider `start` and shared read-only by every
//! region built afterwards. Implementations: in-memory (default), Redis,
//! Memcached, or anything else that satisfies [`CacheClient`].

use crate::config::CacheProperties;
use crate::error::{BoxError, Result};
use std::time::Duration;

pub mod inmemory;
#[cfg(feature = "memcached")]
pub mod memcached;
#[cfg(feature = "redis")]
pub mod redis;

pub use inmemory::{InMemoryClient, InMemoryClientFactory};
#[cfg(feature = "memcached")]
pub use memcached::{MemcachedClient, MemcachedClientFactory, MemcachedConfig};
#[cfg(feature = "redis")]
pub use redis::{RedisClient, RedisClientFactory, RedisConfig};

/// Open connection set to the backing key/value store.
///
/// **IMPORTANT:** All methods use `&self`. The handle is shared behind an
/// `Arc` by every region, so implementations must use interior mutability
/// (pools, DashMap, or external storage).
///
/// **ASYNC:** All methods are async and must be awaited.
#[allow(async_fn_in_trait)]
pub trait CacheClient: Send + Sync {
    /// Retrieve value by physical key.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - Value found
    /// - `Ok(None)` - Key not present
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs (connection lost, etc.)
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store value with optional TTL.
    ///
    /// `ttl: None` means the entry never expires (though the store may
    /// still evict it under memory pressure).
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Remove value by physical key.
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs
    async fn delete(&self, key: &str) -> Result<()>;

    /// Release the connection set.
    ///
    /// Best-effort: failures are the implementation's to log, never the
    /// caller's to handle. Operations issued after shutdown fail with a
    /// backend error.
    async fn shutdown(&self);
}

/// Builds the shared client from the startup property map.
///
/// Injected into the provider so tests and alternative deployments can
/// swap the backing store without touching lifecycle code.
#[allow(async_fn_in_trait)]
pub trait ClientFactory: Send + Sync {
    /// The client type this factory produces.
    type Client: CacheClient;

    /// Create a client from `props`.
    ///
    /// # Errors
    /// May fail with any error; the provider wraps it into
    /// `Error::Initialization` without losing the cause.
    async fn create(&self, props: &CacheProperties)
        -> std::result::Result<Self::Client, BoxError>;
}
