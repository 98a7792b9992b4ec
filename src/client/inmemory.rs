//! In-memory client (default, thread-safe, async).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding.
//! TTL expiration is handled on access. Mostly useful for tests and
//! single-process deployments; production setups point at Redis or
//! Memcached instead.

use super::{CacheClient, ClientFactory};
use crate::config::CacheProperties;
use crate::error::{BoxError, Error, Result};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// In-memory entry with optional expiration.
struct CacheEntry {
    data: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(data: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        CacheEntry { data, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

/// Thread-safe async in-memory client.
///
/// Cloning is cheap and clones share the same store, so a test can keep a
/// handle on the store a provider is using.
///
/// After [`shutdown`](CacheClient::shutdown) every operation fails with
/// `Error::Backend`, matching what a pooled network client does once its
/// connections are gone.
#[derive(Clone)]
pub struct InMemoryClient {
    store: Arc<DashMap<String, CacheEntry>>,
    closed: Arc<AtomicBool>,
}

impl InMemoryClient {
    /// Create a new in-memory client.
    pub fn new() -> Self {
        InMemoryClient {
            store: Arc::new(DashMap::new()),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Current number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::Backend("in-memory client is shut down".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheClient for InMemoryClient {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_open()?;

        if let Some(entry) = self.store.get(key) {
            if !entry.is_expired() {
                debug!("✓ InMemory GET {} -> HIT", key);
                return Ok(Some(entry.data.clone()));
            }
        }

        // Drop the expired entry if one was there.
        self.store.remove(key);
        debug!("✓ InMemory GET {} -> MISS", key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        self.ensure_open()?;

        let entry = CacheEntry::new(value, ttl);
        self.store.insert(key.to_string(), entry);

        if let Some(d) = ttl {
            debug!("✓ InMemory SET {} (TTL: {:?})", key, d);
        } else {
            debug!("✓ InMemory SET {}", key);
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.ensure_open()?;

        self.store.remove(key);
        debug!("✓ InMemory DELETE {}", key);
        Ok(())
    }

    async fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        self.store.clear();
        debug!("✓ InMemory client shut down");
    }
}

/// Factory producing [`InMemoryClient`] handles.
///
/// Ignores the property map — there is nothing to connect to.
#[derive(Clone, Copy, Debug, Default)]
pub struct InMemoryClientFactory;

impl ClientFactory for InMemoryClientFactory {
    type Client = InMemoryClient;

    async fn create(
        &self,
        _props: &CacheProperties,
    ) -> std::result::Result<Self::Client, BoxError> {
        Ok(InMemoryClient::new())
    }
}
