//! Error types for the cache region provider.

use std::fmt;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error type accepted at the collaborator boundaries.
///
/// Client factories and strategy constructors may fail with any error;
/// the provider wraps whatever they return without losing the cause.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for the cache region provider.
///
/// All operations return `Result<T>` where `Result` is defined as
/// `std::result::Result<T, Error>`. Different variants represent different
/// failure modes:
#[derive(Debug)]
pub enum Error {
    /// Client factory failed during `start`.
    ///
    /// Fatal to startup. The provider is left unstarted, so the caller may
    /// retry `start` or abort cleanly. The factory's original error is
    /// preserved as the source.
    Initialization(BoxError),

    /// A named key strategy could not be resolved or constructed.
    ///
    /// Raised by `build_cache` when the resolved `key_strategy` property
    /// names an identifier the registry does not know, or the registered
    /// constructor fails. Fatal to that single `build_cache` call only;
    /// provider state and previously built regions are unaffected.
    StrategyInstantiation {
        /// The strategy identifier that failed to resolve.
        name: String,
        /// Underlying cause, if the constructor itself failed.
        source: Option<BoxError>,
    },

    /// `build_cache` was called with no live client handle.
    ///
    /// Happens before a successful `start` or after `stop`. Callers that
    /// respect the start → build_cache → stop ordering never see this.
    ProviderNotStarted,

    /// A configuration property failed to parse.
    ///
    /// Malformed numeric or boolean values are fatal to the operation that
    /// resolved them; nothing is retried or defaulted over a bad value.
    InvalidProperty {
        /// Full property key, prefix included.
        key: String,
        /// The raw value that failed to parse.
        value: String,
        /// Parser message.
        message: String,
    },

    /// `clear` was called on a region without clear support.
    ///
    /// Enable it with the `clear_supported` property, globally or for the
    /// region. Clear support adds an index lookup to every keyed operation,
    /// which is why it is off unless asked for.
    ClearNotSupported(String),

    /// Backend storage error (Redis, Memcached, etc).
    ///
    /// The shared client is unavailable or returned an error. Also surfaced
    /// by regions whose client has been shut down underneath them.
    Backend(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Initialization(source) => {
                write!(f, "Unable to initialize cache client: {}", source)
            }
            Error::StrategyInstantiation { name, source } => match source {
                Some(cause) => write!(
                    f,
                    "Could not instantiate key strategy {:?}: {}",
                    name, cause
                ),
                None => write!(f, "Unknown key strategy {:?}", name),
            },
            Error::ProviderNotStarted => {
                write!(f, "Cache provider is not started (no live client handle)")
            }
            Error::InvalidProperty {
                key,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value {:?} for property {}: {}",
                    value, key, message
                )
            }
            Error::ClearNotSupported(region) => {
                write!(f, "Clear is not supported for cache region {:?}", region)
            }
            Error::Backend(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Initialization(source) => Some(source.as_ref()),
            Error::StrategyInstantiation {
                source: Some(cause),
                ..
            } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Backend(e.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Error::Backend(format!("Redis error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ClearNotSupported("users".to_string());
        assert_eq!(
            err.to_string(),
            "Clear is not supported for cache region \"users\""
        );
    }

    #[test]
    fn test_initialization_keeps_cause() {
        let cause: BoxError = "connection refused".into();
        let err = Error::Initialization(cause);
        assert!(err.to_string().contains("connection refused"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_unknown_strategy_has_no_source() {
        let err = Error::StrategyInstantiation {
            name: "md5".to_string(),
            source: None,
        };
        assert_eq!(err.to_string(), "Unknown key strategy \"md5\"");
        assert!(std::error::Error::source(&err).is_none());
    }
}
