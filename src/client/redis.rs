//! Redis client implementation.

use super::{CacheClient, ClientFactory};
use crate::config::{CacheProperties, PROP_PREFIX};
use crate::error::{BoxError, Error, Result};
use deadpool_redis::{redis::AsyncCommands, Config as PoolConfig, Pool, Runtime};
use std::time::Duration;

/// Default Redis connection pool size.
/// Formula: (CPU cores × 2) + 1
/// For 8-core systems: 16 connections is optimal
const DEFAULT_POOL_SIZE: u32 = 16;

const DEFAULT_URL: &str = "redis://localhost:6379/0";

const PROP_URL: &str = "url";
const PROP_POOL_SIZE: &str = "pool_size";

/// Configuration for the Redis client.
#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub url: String,
    pub pool_size: u32,
}

impl Default for RedisConfig {
    fn default() -> Self {
        RedisConfig {
            url: DEFAULT_URL.to_string(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl RedisConfig {
    /// Read connection settings from the shared property namespace.
    ///
    /// | Property | Default | Description |
    /// |----------|---------|-------------|
    /// | `cache.url` | `redis://localhost:6379/0` | Redis connection URL |
    /// | `cache.pool_size` | 16 | Connection pool size |
    ///
    /// # Errors
    /// Returns `Error::InvalidProperty` when a numeric value fails to parse.
    pub fn from_properties(props: &CacheProperties) -> Result<Self> {
        let url = props
            .get(&format!("{}{}", PROP_PREFIX, PROP_URL))
            .unwrap_or(DEFAULT_URL)
            .to_string();

        let pool_size = props
            .get_u32(&format!("{}{}", PROP_PREFIX, PROP_POOL_SIZE))?
            .unwrap_or(DEFAULT_POOL_SIZE);

        Ok(RedisConfig { url, pool_size })
    }
}

/// Redis client with connection pooling and async operations.
///
/// Uses deadpool for efficient async resource management and pooling.
///
/// # Example
///
/// ```no_run
/// # use cache_regions::client::{RedisClient, RedisConfig, CacheClient};
/// # use cache_regions::error::Result;
/// # async fn example() -> Result<()> {
/// let client = RedisClient::new(RedisConfig::default()).await?;
///
/// client.set("key", b"value".to_vec(), None).await?;
/// let value = client.get("key").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RedisClient {
    pool: Pool,
}

impl RedisClient {
    /// Create a new Redis client from configuration.
    ///
    /// # Errors
    /// Returns `Err` if pool creation fails.
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let mut cfg = PoolConfig::from_url(&config.url);
        cfg.pool = Some(deadpool_redis::PoolConfig::new(config.pool_size as usize));

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| Error::Backend(format!("Failed to create Redis pool: {}", e)))?;

        info!(
            "✓ Redis client initialized: {} (pool size: {})",
            config.url, config.pool_size
        );

        Ok(RedisClient { pool })
    }
}

impl CacheClient for RedisClient {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| Error::Backend(format!("Failed to get Redis connection: {}", e)))?;

        let value: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| Error::Backend(format!("Redis GET failed for key {}: {}", key, e)))?;

        if value.is_some() {
            debug!("✓ Redis GET {} -> HIT", key);
        } else {
            debug!("✓ Redis GET {} -> MISS", key);
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| Error::Backend(format!("Failed to get Redis connection: {}", e)))?;

        match ttl {
            Some(duration) => {
                let seconds = duration.as_secs();
                conn.set_ex::<_, _, ()>(key, value, seconds)
                    .await
                    .map_err(|e| {
                        Error::Backend(format!("Redis SET_EX failed for key {}: {}", key, e))
                    })?;
                debug!("✓ Redis SET {} (TTL: {}s)", key, seconds);
            }
            None => {
                conn.set::<_, _, ()>(key, value).await.map_err(|e| {
                    Error::Backend(format!("Redis SET failed for key {}: {}", key, e))
                })?;
                debug!("✓ Redis SET {}", key);
            }
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| Error::Backend(format!("Failed to get Redis connection: {}", e)))?;

        conn.del::<_, ()>(key)
            .await
            .map_err(|e| Error::Backend(format!("Redis DEL failed for key {}: {}", key, e)))?;

        debug!("✓ Redis DELETE {}", key);
        Ok(())
    }

    async fn shutdown(&self) {
        self.pool.close();
        debug!("✓ Redis connection pool closed");
    }
}

/// Factory producing [`RedisClient`] handles from the property map.
#[derive(Clone, Copy, Debug, Default)]
pub struct RedisClientFactory;

impl ClientFactory for RedisClientFactory {
    type Client = RedisClient;

    async fn create(
        &self,
        props: &CacheProperties,
    ) -> std::result::Result<Self::Client, BoxError> {
        let config = RedisConfig::from_properties(props)?;
        Ok(RedisClient::new(config).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_config_default() {
        let config = RedisConfig::default();
        assert_eq!(config.url, "redis://localhost:6379/0");
        assert_eq!(config.pool_size, DEFAULT_POOL_SIZE);
    }

    #[test]
    fn test_redis_config_from_properties() {
        let props = CacheProperties::new()
            .set("cache.url", "redis://cache1:6380/2")
            .set("cache.pool_size", "8");

        let config = RedisConfig::from_properties(&props).expect("Failed to read config");
        assert_eq!(config.url, "redis://cache1:6380/2");
        assert_eq!(config.pool_size, 8);
    }

    #[test]
    fn test_redis_config_malformed_pool_size() {
        let props = CacheProperties::new().set("cache.pool_size", "-3");

        let err = RedisConfig::from_properties(&props).expect_err("Expected parse failure");
        assert!(matches!(err, Error::InvalidProperty { .. }));
    }

    // Integration tests - require a running redis server.
    // Run with: cargo test --features redis -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_redis_client_set_get() {
        let client = RedisClient::new(RedisConfig::default())
            .await
            .expect("Failed to create client");

        client
            .set("test_key", b"test_value".to_vec(), None)
            .await
            .expect("Failed to set");

        let result = client.get("test_key").await.expect("Failed to get");
        assert_eq!(result, Some(b"test_value".to_vec()));
    }

    #[tokio::test]
    #[ignore]
    async fn test_redis_client_delete() {
        let client = RedisClient::new(RedisConfig::default())
            .await
            .expect("Failed to create client");

        client
            .set("delete_key", b"value".to_vec(), None)
            .await
            .expect("Failed to set");
        client
            .delete("delete_key")
            .await
            .expect("Failed to delete");

        let result = client.get("delete_key").await.expect("Failed to get");
        assert_eq!(result, None);
    }
}
