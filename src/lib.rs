//! # cache-regions
//!
//! A configuration-driven cache region provider for Rust.
//!
//! ## Features
//!
//! - **Named regions:** Partition one backing store into independently
//!   tuned cache regions
//! - **Layered configuration:** Cache-wide defaults, overridable per
//!   region through one flat property map
//! - **Pluggable key strategies:** Logical-to-physical key transformation
//!   selected by identifier at runtime
//! - **Backend Agnostic:** Support for in-memory, Redis, Memcached, and
//!   custom clients
//! - **One shared handle:** A single client created at `start`, shared
//!   read-only by every region, released at `stop`
//!
//! ## Quick Start
//!
//! ```
//! use cache_regions::{CacheProperties, InMemoryClientFactory, RegionCacheProvider};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> cache_regions::error::Result<()> {
//! // 1. Describe the cache in properties
//! let props = CacheProperties::new()
//!     .set("cache.cache_time_seconds", "300")
//!     .set("cache.users.cache_time_seconds", "60")
//!     .set("cache.users.clear_supported", "true");
//!
//! // 2. Start the provider - this opens the one shared client
//! let mut provider = RegionCacheProvider::new(InMemoryClientFactory);
//! provider.start(&props).await?;
//!
//! // 3. Build regions - each resolves its own policy from the map
//! let users = provider.build_cache("users", &props)?;
//! let orders = provider.build_cache("orders", &props)?;
//!
//! users.put("42", b"alice".to_vec()).await?;
//! assert!(users.get("42").await?.is_some());
//! assert!(orders.get("42").await?.is_none());
//!
//! // 4. Stop when the application shuts down
//! provider.stop().await;
//! # Ok(())
//! # }
//! ```
//!
//! Production deployments enable the `memcached` or `redis` feature and
//! hand the provider the matching factory; connection settings ride in the
//! same property map (`cache.servers`, `cache.url`, `cache.pool_size`).

#[macro_use]
extern crate log;

pub mod client;
pub mod config;
pub mod error;
pub mod key;
pub mod observability;
pub mod provider;
pub mod region;
pub mod timestamp;

// Re-exports for convenience
pub use client::{CacheClient, ClientFactory, InMemoryClient, InMemoryClientFactory};
pub use config::{CacheProperties, RegionSettings};
pub use error::{Error, Result};
pub use key::{KeyStrategy, StrategyRegistry};
pub use provider::RegionCacheProvider;
pub use region::CacheRegion;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
