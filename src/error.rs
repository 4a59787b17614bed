//! Error types for tiercache

use thiserror::Error;

/// Result type alias for tiercache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Boxed error used at the codec and adapter boundaries.
///
/// Pluggable implementations surface their own error types through this
/// alias; [`CacheError`] attaches them as sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which tier a payload came from. Attached to decode errors so callers can
/// tell a corrupt local entry from a corrupt remote one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Local,
    Remote,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Local => write!(f, "local"),
            Tier::Remote => write!(f, "remote"),
        }
    }
}

/// Cache client error taxonomy.
///
/// A single call returns at most one of these; they are mutually exclusive.
/// A remote outage is never reported as a miss — callers that treated it as
/// one would recompute and overwrite good data.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No tier had the value. Expected; recover by computing and calling set.
    #[error("cache miss: {0}")]
    Miss(String),

    /// The remote tier failed (transport, protocol, or timeout).
    #[error("remote cache error for key '{key}': {source}")]
    Remote {
        key: String,
        #[source]
        source: BoxError,
    },

    /// The value could not be encoded; no tier was written.
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: BoxError,
    },

    /// Cached bytes did not decode into the requested type.
    #[error("failed to decode cached bytes for key '{key}' ({tier} tier): {source}")]
    Decode {
        key: String,
        tier: Tier,
        #[source]
        source: BoxError,
    },
}

impl CacheError {
    /// True when the error is a plain cache miss rather than a failure.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::Miss(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_predicate() {
        let err = CacheError::Miss("user:1".to_string());
        assert!(err.is_miss());

        let err = CacheError::Remote {
            key: "user:1".to_string(),
            source: "connection refused".into(),
        };
        assert!(!err.is_miss());
    }

    #[test]
    fn test_error_messages_carry_key_and_tier() {
        let err = CacheError::Decode {
            key: "user:1".to_string(),
            tier: Tier::Remote,
            source: "unexpected type".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("user:1"));
        assert!(msg.contains("remote"));
    }

    #[test]
    fn test_remote_error_exposes_source() {
        use std::error::Error;

        let err = CacheError::Remote {
            key: "k".to_string(),
            source: "boom".into(),
        };
        assert!(err.source().is_some());
    }
}
