//! Configuration model and per-region policy resolution.
//!
//! All tuning flows through a single flat, string-keyed property map
//! ([`CacheProperties`]), handed to the provider wholesale at `start` and
//! again at each `build_cache` call. Keys are namespaced:
//!
//! - `cache.<property>` — cache-wide setting
//! - `cache.<region>.<property>` — per-region override
//!
//! # Cache-wide properties
//!
//! | Property | Default | Description |
//! |----------|---------|-------------|
//! | `cache.cache_time_seconds` | 300 | Seconds items stay cached. Overridable per region. |
//! | `cache.clear_supported` | false | Enables `clear()` for all regions. Adds an index lookup to every get/put, so it is off by default. |
//! | `cache.key_strategy` | none | Key strategy identifier, looked up in the provider's registry. |
//!
//! # Region properties
//!
//! `cache.<region>.cache_time_seconds`, `cache.<region>.clear_supported`
//! and `cache.<region>.key_strategy` tune a single region. TTL and clear
//! support resolve region-first; the key strategy resolves cache-wide
//! first (see [`RegionSettings::resolve`]).
//!
//! Nothing holds parsed configuration between calls — the map is re-read
//! on every resolution.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// Namespace prefix shared by every property key.
pub const PROP_PREFIX: &str = "cache.";

/// Built-in TTL applied when neither region nor cache-wide value is set.
pub const DEFAULT_CACHE_TIME_SECONDS: u64 = 300;

/// Clear support is opt-in.
pub const DEFAULT_CLEAR_SUPPORTED: bool = false;

const PROP_CACHE_TIME_SECONDS: &str = "cache_time_seconds";
const PROP_CLEAR_SUPPORTED: &str = "clear_supported";
const PROP_KEY_STRATEGY: &str = "key_strategy";

/// Immutable ordered string-to-string property map.
///
/// # Example
///
/// ```
/// use cache_regions::config::CacheProperties;
///
/// let props = CacheProperties::new()
///     .set("cache.cache_time_seconds", "600")
///     .set("cache.users.cache_time_seconds", "60");
///
/// assert_eq!(props.get("cache.cache_time_seconds"), Some("600"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheProperties {
    entries: BTreeMap<String, String>,
}

impl CacheProperties {
    /// Create an empty property map.
    pub fn new() -> Self {
        CacheProperties {
            entries: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Look up a raw string value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether any properties are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up and parse an unsigned integer value.
    ///
    /// # Errors
    /// Returns `Error::InvalidProperty` when the value is present but does
    /// not parse. A missing key is `Ok(None)`, never an error.
    pub fn get_u64(&self, key: &str) -> Result<Option<u64>> {
        self.parse_value(key)
    }

    /// Look up and parse a `u32` value (pool sizes and the like).
    ///
    /// # Errors
    /// Returns `Error::InvalidProperty` when the value does not parse.
    pub fn get_u32(&self, key: &str) -> Result<Option<u32>> {
        self.parse_value(key)
    }

    /// Look up and parse a boolean value.
    ///
    /// Only `"true"` and `"false"` are accepted; anything else is a
    /// configuration error rather than a silent `false`.
    ///
    /// # Errors
    /// Returns `Error::InvalidProperty` when the value does not parse.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.parse_value(key)
    }

    fn parse_value<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(key) {
            Some(raw) => raw.parse().map(Some).map_err(|e: T::Err| {
                Error::InvalidProperty {
                    key: key.to_string(),
                    value: raw.to_string(),
                    message: e.to_string(),
                }
            }),
            None => Ok(None),
        }
    }
}

impl FromIterator<(String, String)> for CacheProperties {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        CacheProperties {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Effective policy for one cache region.
///
/// Derived from [`CacheProperties`] at each `build_cache` call and owned by
/// the resulting region for that region's lifetime. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSettings {
    /// Seconds entries stay cached.
    pub cache_time_seconds: u64,
    /// Whether `clear()` is honored for this region.
    pub clear_supported: bool,
    /// Resolved key strategy identifier, if any was configured.
    pub key_strategy: Option<String>,
}

impl RegionSettings {
    /// Resolve the effective settings for `region` from `props`.
    ///
    /// Lookup order per property:
    ///
    /// - `cache_time_seconds`: `cache.<region>.` key, else `cache.` key,
    ///   else 300.
    /// - `clear_supported`: `cache.<region>.` key, else `cache.` key,
    ///   else false.
    /// - `key_strategy`: `cache.` key, else `cache.<region>.` key, else
    ///   none. Global-first, the reverse of the other two properties.
    ///
    /// # Errors
    /// Returns `Error::InvalidProperty` when any consulted value fails to
    /// parse; no default papers over a malformed value.
    pub fn resolve(region: &str, props: &CacheProperties) -> Result<Self> {
        let region_prefix = format!("{}{}.", PROP_PREFIX, region);

        let cache_time_seconds =
            match props.get_u64(&format!("{}{}", region_prefix, PROP_CACHE_TIME_SECONDS))? {
                Some(seconds) => seconds,
                None => props
                    .get_u64(&format!("{}{}", PROP_PREFIX, PROP_CACHE_TIME_SECONDS))?
                    .unwrap_or(DEFAULT_CACHE_TIME_SECONDS),
            };

        let clear_supported =
            match props.get_bool(&format!("{}{}", region_prefix, PROP_CLEAR_SUPPORTED))? {
                Some(flag) => flag,
                None => props
                    .get_bool(&format!("{}{}", PROP_PREFIX, PROP_CLEAR_SUPPORTED))?
                    .unwrap_or(DEFAULT_CLEAR_SUPPORTED),
            };

        // key_strategy resolves cache-wide first; region value only applies
        // when no cache-wide value is set.
        let key_strategy = props
            .get(&format!("{}{}", PROP_PREFIX, PROP_KEY_STRATEGY))
            .or_else(|| props.get(&format!("{}{}", region_prefix, PROP_KEY_STRATEGY)))
            .map(str::to_string);

        Ok(RegionSettings {
            cache_time_seconds,
            clear_supported,
            key_strategy,
        })
    }

    /// The resolved TTL as a `Duration`.
    pub fn cache_time(&self) -> Duration {
        Duration::from_secs(self.cache_time_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_properties_yield_builtin_defaults() {
        let props = CacheProperties::new();
        let settings = RegionSettings::resolve("users", &props).expect("Failed to resolve");

        assert_eq!(settings.cache_time_seconds, DEFAULT_CACHE_TIME_SECONDS);
        assert!(!settings.clear_supported);
        assert_eq!(settings.key_strategy, None);
    }

    #[test]
    fn test_cache_wide_values_apply_to_every_region() {
        let props = CacheProperties::new()
            .set("cache.cache_time_seconds", "600")
            .set("cache.clear_supported", "true");

        for region in ["users", "orders"] {
            let settings = RegionSettings::resolve(region, &props).expect("Failed to resolve");
            assert_eq!(settings.cache_time_seconds, 600);
            assert!(settings.clear_supported);
        }
    }

    #[test]
    fn test_region_cache_time_overrides_cache_wide() {
        let props = CacheProperties::new()
            .set("cache.cache_time_seconds", "60")
            .set("cache.users.cache_time_seconds", "90");

        let users = RegionSettings::resolve("users", &props).expect("Failed to resolve");
        assert_eq!(users.cache_time_seconds, 90);

        // Other regions keep the cache-wide value.
        let orders = RegionSettings::resolve("orders", &props).expect("Failed to resolve");
        assert_eq!(orders.cache_time_seconds, 60);
    }

    #[test]
    fn test_region_clear_supported_overrides_cache_wide() {
        let props = CacheProperties::new()
            .set("cache.clear_supported", "false")
            .set("cache.users.clear_supported", "true");

        let settings = RegionSettings::resolve("users", &props).expect("Failed to resolve");
        assert!(settings.clear_supported);
    }

    #[test]
    fn test_key_strategy_resolves_cache_wide_first() {
        // The key strategy lookup order is the reverse of the other two
        // properties: the cache-wide value wins over the region value.
        let props = CacheProperties::new()
            .set("cache.key_strategy", "sha256")
            .set("cache.users.key_strategy", "default");

        let settings = RegionSettings::resolve("users", &props).expect("Failed to resolve");
        assert_eq!(settings.key_strategy.as_deref(), Some("sha256"));
    }

    #[test]
    fn test_region_key_strategy_applies_when_no_cache_wide_value() {
        let props = CacheProperties::new().set("cache.users.key_strategy", "sha256");

        let users = RegionSettings::resolve("users", &props).expect("Failed to resolve");
        assert_eq!(users.key_strategy.as_deref(), Some("sha256"));

        let orders = RegionSettings::resolve("orders", &props).expect("Failed to resolve");
        assert_eq!(orders.key_strategy, None);
    }

    #[test]
    fn test_malformed_cache_time_is_an_error() {
        let props = CacheProperties::new().set("cache.users.cache_time_seconds", "five minutes");

        let err = RegionSettings::resolve("users", &props).expect_err("Expected parse failure");
        assert!(matches!(
            err,
            Error::InvalidProperty { ref key, .. } if key == "cache.users.cache_time_seconds"
        ));
    }

    #[test]
    fn test_negative_cache_time_is_an_error() {
        let props = CacheProperties::new().set("cache.cache_time_seconds", "-1");

        assert!(RegionSettings::resolve("users", &props).is_err());
    }

    #[test]
    fn test_malformed_clear_supported_is_an_error() {
        // Only "true"/"false" parse; "yes" is a configuration mistake, not
        // a silent false.
        let props = CacheProperties::new().set("cache.clear_supported", "yes");

        let err = RegionSettings::resolve("users", &props).expect_err("Expected parse failure");
        assert!(matches!(err, Error::InvalidProperty { .. }));
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let props = CacheProperties::new()
            .set("cache.cache_time_seconds", "120")
            .set("cache.users.clear_supported", "true");

        let first = RegionSettings::resolve("users", &props).expect("Failed to resolve");
        let second = RegionSettings::resolve("users", &props).expect("Failed to resolve");
        assert_eq!(first, second);
    }

    #[test]
    fn test_properties_deserialize_from_json() {
        let props: CacheProperties = serde_json::from_str(
            r#"{
                "cache.cache_time_seconds": "45",
                "cache.users.key_strategy": "sha256"
            }"#,
        )
        .expect("Failed to deserialize");

        let settings = RegionSettings::resolve("users", &props).expect("Failed to resolve");
        assert_eq!(settings.cache_time_seconds, 45);
        assert_eq!(settings.key_strategy.as_deref(), Some("sha256"));
    }

    #[test]
    fn test_cache_time_duration() {
        let settings = RegionSettings {
            cache_time_seconds: 90,
            clear_supported: false,
            key_strategy: None,
        };
        assert_eq!(settings.cache_time(), Duration::from_secs(90));
    }
}
