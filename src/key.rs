//! Key strategies: pluggable logical-to-physical key transformation.
//!
//! Strategies are stateless and resolved by string identifier through
//! [`StrategyRegistry`], so a property value like
//! `cache.key_strategy = "sha256"` picks the implementation at runtime.
//! Custom strategies register a constructor under their own identifier.

use crate::error::{BoxError, Error, Result};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

/// Longest physical key the backing stores accept (memcached limit).
pub const MAX_KEY_LENGTH: usize = 250;

/// Transformation from a logical cache key to the physical key used
/// against the backing store.
///
/// Implementations must be stateless: one instance may serve every region
/// that names it, concurrently.
pub trait KeyStrategy: Send + Sync {
    /// Transform `raw_key` into the physical key.
    fn generate_key(&self, raw_key: &str) -> String;
}

/// Default strategy: pass keys through untouched unless the backing store
/// would reject them.
///
/// Keys containing whitespace or longer than [`MAX_KEY_LENGTH`] bytes are
/// replaced by their SHA-256 hex digest, which is always store-safe.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultKeyStrategy;

impl std::fmt::Debug for dyn KeyStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn KeyStrategy")
    }
}

impl KeyStrategy for DefaultKeyStrategy {
    fn generate_key(&self, raw_key: &str) -> String {
        if raw_key.len() > MAX_KEY_LENGTH || raw_key.contains(char::is_whitespace) {
            sha256_hex(raw_key)
        } else {
            raw_key.to_string()
        }
    }
}

/// Strategy that always hashes, producing uniform 64-byte hex keys.
///
/// Useful when logical keys carry data that should not appear verbatim in
/// the backing store, or vary wildly in length.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256KeyStrategy;

impl KeyStrategy for Sha256KeyStrategy {
    fn generate_key(&self, raw_key: &str) -> String {
        sha256_hex(raw_key)
    }
}

fn sha256_hex(raw: &str) -> String {
    Sha256::digest(raw.as_bytes())
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

/// Type alias for strategy constructor closures.
type StrategyCtor =
    Box<dyn Fn() -> std::result::Result<Arc<dyn KeyStrategy>, BoxError> + Send + Sync>;

/// Registry mapping strategy identifiers to constructors.
///
/// Resolution happens per `build_cache` call; constructors are expected to
/// be cheap. An unknown identifier fails with a typed error instead of a
/// runtime lookup panic.
///
/// # Example
///
/// ```
/// use cache_regions::key::{KeyStrategy, StrategyRegistry};
/// use std::sync::Arc;
///
/// struct UpperStrategy;
///
/// impl KeyStrategy for UpperStrategy {
///     fn generate_key(&self, raw_key: &str) -> String {
///         raw_key.to_uppercase()
///     }
/// }
///
/// let mut registry = StrategyRegistry::with_builtins();
/// registry.register("upper", || Ok(Arc::new(UpperStrategy)));
///
/// let strategy = registry.instantiate("upper").unwrap();
/// assert_eq!(strategy.generate_key("users:1"), "USERS:1");
/// ```
pub struct StrategyRegistry {
    constructors: HashMap<String, StrategyCtor>,
}

impl StrategyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        StrategyRegistry {
            constructors: HashMap::new(),
        }
    }

    /// Create a registry seeded with the built-in strategies:
    /// `"default"` ([`DefaultKeyStrategy`]) and `"sha256"`
    /// ([`Sha256KeyStrategy`]).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("default", || Ok(Arc::new(DefaultKeyStrategy)));
        registry.register("sha256", || Ok(Arc::new(Sha256KeyStrategy)));
        registry
    }

    /// Register a strategy constructor under `name`.
    ///
    /// Re-registering a name replaces the previous constructor.
    pub fn register<F>(&mut self, name: impl Into<String>, ctor: F)
    where
        F: Fn() -> std::result::Result<Arc<dyn KeyStrategy>, BoxError> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Box::new(ctor));
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Instantiate the strategy registered under `name`.
    ///
    /// # Errors
    /// Returns `Error::StrategyInstantiation` when `name` is unknown or
    /// the registered constructor fails; the constructor's error is kept
    /// as the source.
    pub fn instantiate(&self, name: &str) -> Result<Arc<dyn KeyStrategy>> {
        let ctor = self
            .constructors
            .get(name)
            .ok_or_else(|| Error::StrategyInstantiation {
                name: name.to_string(),
                source: None,
            })?;

        ctor().map_err(|cause| Error::StrategyInstantiation {
            name: name.to_string(),
            source: Some(cause),
        })
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
