//! Cache client orchestration
//!
//! [`CacheClient`] is the decision point of the crate: for every operation
//! it chooses which tiers to touch, in what order, and how to reconcile
//! hit/miss/failure across them. Reads go local-then-remote; writes go
//! remote-then-local so the local tier never holds a value the remote tier
//! never accepted. The tiers themselves are opaque byte stores behind the
//! [`LocalCache`] and [`RemoteCache`] contracts.

use crate::codec::Codec;
use crate::error::{BoxError, CacheError, Result, Tier};
use crate::local::LocalCache;
use crate::remote::RemoteCache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Cause attached to a [`CacheError::Remote`] when a configured remote
/// timeout elapses before the in-flight call completes.
#[derive(Debug, Error)]
#[error("remote operation timed out after {0:?}")]
pub struct RemoteTimeout(pub Duration);

/// Two-tier cache client.
///
/// Holds a codec plus up to two optional tiers. The client is stateless
/// across calls — no decoded value or payload outlives the call that
/// produced it — so a single instance (or clones of it, which share the
/// tiers) can serve unbounded concurrent callers, provided the adapters are
/// themselves thread-safe.
///
/// # Example
/// ```rust,no_run
/// use std::sync::Arc;
/// use tiercache::{CacheClient, CacheError, MemoryCache, MsgPackCodec};
///
/// #[tokio::main]
/// async fn main() -> Result<(), CacheError> {
///     let client = CacheClient::builder(MsgPackCodec)
///         .local(Arc::new(MemoryCache::new()))
///         .build();
///
///     client.set("user:1", "Ada Lovelace").await?;
///     let name: String = client.get("user:1").await?;
///     println!("cached: {name}");
///     Ok(())
/// }
/// ```
pub struct CacheClient<C> {
    codec: Arc<C>,
    local: Option<Arc<dyn LocalCache>>,
    remote: Option<Arc<dyn RemoteCache>>,
    remote_timeout: Option<Duration>,
}

impl<C> Clone for CacheClient<C> {
    fn clone(&self) -> Self {
        Self {
            codec: Arc::clone(&self.codec),
            local: self.local.clone(),
            remote: self.remote.clone(),
            remote_timeout: self.remote_timeout,
        }
    }
}

impl<C: Codec> CacheClient<C> {
    /// Start building a client around the given codec. Both tiers are
    /// optional; a client with neither tier misses every read.
    pub fn builder(codec: C) -> CacheClientBuilder<C> {
        CacheClientBuilder {
            codec,
            local: None,
            remote: None,
            remote_timeout: None,
        }
    }

    /// Look up `key` and decode the payload into `T`.
    ///
    /// Consults the local tier first, then the remote tier. Returns
    /// [`CacheError::Miss`] when no tier has the key; a remote I/O failure
    /// is returned as [`CacheError::Remote`], never downgraded to a miss.
    /// A remote hit is **not** written back into the local tier — only
    /// [`set`](Self::set) populates it.
    pub async fn get<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if let Some(local) = &self.local {
            if let Some(buf) = local.get(key) {
                debug!(key, "local tier hit");
                return self.decode(key, Tier::Local, &buf);
            }
        }

        if let Some(remote) = &self.remote {
            if let Some(buf) = self.remote_op(key, remote.get(key)).await? {
                debug!(key, "local tier miss, remote tier hit");
                return self.decode(key, Tier::Remote, &buf);
            }
        }

        debug!(key, "cache miss");
        Err(CacheError::Miss(key.to_string()))
    }

    /// Encode `value` and store it under `key`.
    ///
    /// The remote tier is written first; if that write fails nothing is
    /// written locally, so the local tier can be stale-by-omission but never
    /// ahead of the remote tier. Encoding failure aborts before any tier is
    /// touched.
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let buf = self
            .codec
            .encode(value)
            .map_err(|source| CacheError::Encode {
                key: key.to_string(),
                source,
            })?;

        if let Some(remote) = &self.remote {
            self.remote_op(key, remote.set(key, &buf)).await?;
            debug!(key, bytes = buf.len(), "remote tier written");
        }

        if let Some(local) = &self.local {
            local.set(key, buf);
            debug!(key, "local tier written");
        }

        Ok(())
    }

    /// Remove `key` from both tiers.
    ///
    /// Removing a key neither tier holds is a no-op, not an error. The
    /// overall result is the remote removal's, so callers learn when the
    /// authoritative tier may still hold the entry.
    pub async fn remove(&self, key: &str) -> Result<()> {
        if let Some(local) = &self.local {
            local.remove(key);
        }

        if let Some(remote) = &self.remote {
            self.remote_op(key, remote.remove(key)).await?;
        }

        debug!(key, "removed");
        Ok(())
    }

    fn decode<T>(&self, key: &str, tier: Tier, buf: &[u8]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.codec.decode(buf).map_err(|source| CacheError::Decode {
            key: key.to_string(),
            tier,
            source,
        })
    }

    /// Run a remote-tier call, applying the configured timeout and wrapping
    /// any failure (including elapse) into [`CacheError::Remote`].
    async fn remote_op<T, F>(&self, key: &str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, BoxError>>,
    {
        let outcome = match self.remote_timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(outcome) => outcome,
                Err(_) => Err(Box::new(RemoteTimeout(limit)) as BoxError),
            },
            None => fut.await,
        };

        outcome.map_err(|source| CacheError::Remote {
            key: key.to_string(),
            source,
        })
    }
}

/// Builder for [`CacheClient`]
pub struct CacheClientBuilder<C> {
    codec: C,
    local: Option<Arc<dyn LocalCache>>,
    remote: Option<Arc<dyn RemoteCache>>,
    remote_timeout: Option<Duration>,
}

impl<C: Codec> CacheClientBuilder<C> {
    /// Attach a local (in-process) tier
    pub fn local(mut self, local: Arc<dyn LocalCache>) -> Self {
        self.local = Some(local);
        self
    }

    /// Attach a remote (out-of-process) tier
    pub fn remote(mut self, remote: Arc<dyn RemoteCache>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Bound every remote-tier call; elapse surfaces as
    /// [`CacheError::Remote`] with a [`RemoteTimeout`] cause
    pub fn remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> CacheClient<C> {
        CacheClient {
            codec: Arc::new(self.codec),
            local: self.local,
            remote: self.remote,
            remote_timeout: self.remote_timeout,
        }
    }
}
