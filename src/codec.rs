//! Value codecs
//!
//! A [`Codec`] turns a typed value into an opaque byte payload and back.
//! The cache client never looks inside a payload; the codec chosen at
//! construction time fully owns the byte format.

use crate::error::BoxError;
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Converts typed values to and from opaque byte payloads.
///
/// `encode` must be a pure function of the value, and `decode` must accept
/// any payload the matching `encode` produced. Implementations are shared
/// across concurrent call sites, so they must not require external
/// synchronization.
pub trait Codec: Send + Sync {
    /// Encode a value into an owned byte payload.
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, BoxError>
    where
        T: Serialize + ?Sized;

    /// Decode a payload produced by the matching `encode`.
    fn decode<T>(&self, buf: &[u8]) -> Result<T, BoxError>
    where
        T: DeserializeOwned;
}

/// JSON codec backed by `serde_json`.
///
/// Human-readable payloads; the safe default when the remote store is shared
/// with non-Rust consumers.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, BoxError>
    where
        T: Serialize + ?Sized,
    {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode<T>(&self, buf: &[u8]) -> Result<T, BoxError>
    where
        T: DeserializeOwned,
    {
        Ok(serde_json::from_slice(buf)?)
    }
}

/// MessagePack codec backed by `rmp-serde`.
///
/// Struct fields are encoded by name so payloads survive field reordering
/// between writer and reader builds.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackCodec;

impl Codec for MsgPackCodec {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, BoxError>
    where
        T: Serialize + ?Sized,
    {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    fn decode<T>(&self, buf: &[u8]) -> Result<T, BoxError>
    where
        T: DeserializeOwned,
    {
        Ok(rmp_serde::from_slice(buf)?)
    }
}

/// Upper bound on idle scratch buffers kept alive between calls.
const DEFAULT_MAX_POOLED: usize = 32;

/// MessagePack codec that reuses encode scratch buffers.
///
/// Each `encode` call borrows a buffer from a shared pool, serializes into
/// it, copies the payload out, and returns the cleared buffer to the pool —
/// on every exit path, including serialization errors. No two concurrent
/// calls can observe each other's buffer state: a buffer is owned by exactly
/// one call between acquire and release.
///
/// Wire format is identical to [`MsgPackCodec`]; the two decode each
/// other's payloads.
pub struct PooledMsgPackCodec {
    pool: Mutex<Vec<Vec<u8>>>,
    max_pooled: usize,
}

impl PooledMsgPackCodec {
    /// Create a pool retaining up to [`DEFAULT_MAX_POOLED`] idle buffers.
    pub fn new() -> Self {
        Self::with_max_pooled(DEFAULT_MAX_POOLED)
    }

    /// Create a pool retaining at most `max_pooled` idle buffers; buffers
    /// released beyond that are dropped.
    pub fn with_max_pooled(max_pooled: usize) -> Self {
        Self {
            pool: Mutex::new(Vec::new()),
            max_pooled,
        }
    }

    fn acquire(&self) -> Vec<u8> {
        self.pool.lock().pop().unwrap_or_default()
    }

    fn release(&self, mut buf: Vec<u8>) {
        buf.clear();
        let mut pool = self.pool.lock();
        if pool.len() < self.max_pooled {
            pool.push(buf);
        }
    }

    #[cfg(test)]
    fn idle_buffers(&self) -> usize {
        self.pool.lock().len()
    }
}

impl Default for PooledMsgPackCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the scratch buffer to the pool when dropped, so early returns
/// and panics inside `encode` cannot leak or retain a buffer.
struct ScratchGuard<'a> {
    owner: &'a PooledMsgPackCodec,
    buf: Vec<u8>,
}

impl Drop for ScratchGuard<'_> {
    fn drop(&mut self) {
        self.owner.release(std::mem::take(&mut self.buf));
    }
}

impl Codec for PooledMsgPackCodec {
    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, BoxError>
    where
        T: Serialize + ?Sized,
    {
        let mut scratch = ScratchGuard {
            owner: self,
            buf: self.acquire(),
        };

        rmp_serde::encode::write_named(&mut scratch.buf, value)?;

        // The payload must be an owned copy: the scratch buffer goes back
        // to the pool and will be overwritten by a later call.
        Ok(scratch.buf.as_slice().to_vec())
    }

    fn decode<T>(&self, buf: &[u8]) -> Result<T, BoxError>
    where
        T: DeserializeOwned,
    {
        Ok(rmp_serde::from_slice(buf)?)
    }
}
