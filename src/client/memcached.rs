//! Memcached client implementation.

use super::{CacheClient, ClientFactory};
use crate::config::{CacheProperties, PROP_PREFIX};
use crate::error::{BoxError, Error, Result};
use async_memcached::AsciiProtocol;
use deadpool_memcached::{Manager, Pool};
use std::time::Duration;

/// Default Memcached connection pool size.
/// Formula: (CPU cores × 2) + 1
/// For 8-core systems: 16 connections is optimal
const DEFAULT_POOL_SIZE: u32 = 16;

const DEFAULT_SERVERS: &str = "localhost:11211";
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

const PROP_SERVERS: &str = "servers";
const PROP_POOL_SIZE: &str = "pool_size";
const PROP_CONNECTION_TIMEOUT_MS: &str = "connection_timeout_ms";

/// Configuration for the Memcached client.
#[derive(Clone, Debug)]
pub struct MemcachedConfig {
    pub servers: Vec<String>, // e.g., ["localhost:11211", "cache2:11211"]
    pub connection_timeout: Duration,
    pub pool_size: u32,
}

impl Default for MemcachedConfig {
    fn default() -> Self {
        MemcachedConfig {
            servers: vec![DEFAULT_SERVERS.to_string()],
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl MemcachedConfig {
    /// Read connection settings from the shared property namespace.
    ///
    /// | Property | Default | Description |
    /// |----------|---------|-------------|
    /// | `cache.servers` | `localhost:11211` | Space-delimited host:port list |
    /// | `cache.pool_size` | 16 | Connection pool size |
    /// | `cache.connection_timeout_ms` | 5000 | Connect timeout in milliseconds |
    ///
    /// # Errors
    /// Returns `Error::InvalidProperty` when a numeric value fails to parse.
    pub fn from_properties(props: &CacheProperties) -> Result<Self> {
        let servers = props
            .get(&format!("{}{}", PROP_PREFIX, PROP_SERVERS))
            .unwrap_or(DEFAULT_SERVERS)
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let pool_size = props
            .get_u32(&format!("{}{}", PROP_PREFIX, PROP_POOL_SIZE))?
            .unwrap_or(DEFAULT_POOL_SIZE);

        let connection_timeout = props
            .get_u64(&format!("{}{}", PROP_PREFIX, PROP_CONNECTION_TIMEOUT_MS))?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_CONNECTION_TIMEOUT);

        Ok(MemcachedConfig {
            servers,
            connection_timeout,
            pool_size,
        })
    }
}

/// Memcached client with connection pooling and async operations.
///
/// # Example
///
/// ```no_run
/// # use cache_regions::client::{MemcachedClient, MemcachedConfig, CacheClient};
/// # use cache_regions::error::Result;
/// # async fn example() -> Result<()> {
/// let config = MemcachedConfig {
///     servers: vec!["localhost:11211".to_string()],
///     ..Default::default()
/// };
///
/// let client = MemcachedClient::new(config).await?;
/// client.set("key", b"value".to_vec(), None).await?;
/// let value = client.get("key").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MemcachedClient {
    pool: Pool,
}

impl MemcachedClient {
    /// Create a new Memcached client from configuration.
    ///
    /// # Errors
    /// Returns `Err` if connection pool creation fails
    pub async fn new(config: MemcachedConfig) -> Result<Self> {
        // deadpool-memcached Manager takes a single server address.
        // Use the first server from the list.
        let addr = config
            .servers
            .first()
            .ok_or_else(|| Error::Backend("No memcached servers specified".to_string()))?
            .clone();

        let manager = Manager::new(addr.clone());

        let pool = Pool::builder(manager)
            .max_size(config.pool_size as usize)
            .build()
            .map_err(|e| Error::Backend(format!("Failed to create connection pool: {}", e)))?;

        info!(
            "✓ Memcached client initialized with server: {} (pool size: {})",
            addr, config.pool_size
        );

        Ok(MemcachedClient { pool })
    }
}

impl CacheClient for MemcachedClient {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.pool.get().await.map_err(|e| {
            Error::Backend(format!("Failed to get Memcached connection: {}", e))
        })?;

        match conn.get(key).await {
            Ok(Some(value)) => {
                debug!("✓ Memcached GET {} -> HIT", key);
                Ok(value.data)
            }
            Ok(None) => {
                debug!("✓ Memcached GET {} -> MISS", key);
                Ok(None)
            }
            Err(e) => Err(Error::Backend(format!(
                "Memcached GET failed for key {}: {}",
                key, e
            ))),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.pool.get().await.map_err(|e| {
            Error::Backend(format!("Failed to get Memcached connection: {}", e))
        })?;

        // Values < 2592000 (30 days) are interpreted as seconds from now.
        // None = item never expires (but may still be evicted when full).
        let expiration = ttl.map(|d| d.as_secs() as i64);

        conn.set(key, value.as_slice(), expiration, None)
            .await
            .map_err(|e| Error::Backend(format!("Memcached SET failed for key {}: {}", key, e)))?;

        if let Some(d) = ttl {
            debug!("✓ Memcached SET {} (TTL: {:?})", key, d);
        } else {
            debug!("✓ Memcached SET {}", key);
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.pool.get().await.map_err(|e| {
            Error::Backend(format!("Failed to get Memcached connection: {}", e))
        })?;

        conn.delete(key).await.map_err(|e| {
            Error::Backend(format!("Memcached DELETE failed for key {}: {}", key, e))
        })?;

        debug!("✓ Memcached DELETE {}", key);
        Ok(())
    }

    async fn shutdown(&self) {
        self.pool.close();
        debug!("✓ Memcached connection pool closed");
    }
}

/// Factory producing [`MemcachedClient`] handles from the property map.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemcachedClientFactory;

impl ClientFactory for MemcachedClientFactory {
    type Client = MemcachedClient;

    async fn create(
        &self,
        props: &CacheProperties,
    ) -> std::result::Result<Self::Client, BoxError> {
        let config = MemcachedConfig::from_properties(props)?;
        Ok(MemcachedClient::new(config).await?)
    }
}
