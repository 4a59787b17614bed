//! # tiercache
//!
//! Two-tier caching façade: a uniform get/set/remove contract over an
//! optional in-process tier backed by an optional shared remote tier, with
//! pluggable value serialization.
//!
//! ## Features
//!
//! - 🧭 **Orchestrating client**: local-then-remote reads, remote-then-local
//!   writes, a miss signal distinct from every failure kind
//! - 🔌 **Pluggable tiers**: bring any `LocalCache` / `RemoteCache`
//!   implementation; either tier can be absent
//! - 📦 **Pluggable codecs**: JSON, MessagePack, and a buffer-pooling
//!   MessagePack variant for hot write paths
//! - 🔄 **Async/Await**: remote calls run on Tokio, honor cancellation, and
//!   can be bounded by a per-call timeout
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tiercache::{
//!     BoundedCache, CacheClient, HttpRemoteCache, HttpRemoteConfig, MsgPackCodec,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let remote = HttpRemoteCache::new(
//!         HttpRemoteConfig::new("http://localhost:15500").with_ttl_secs(600),
//!     )?;
//!
//!     let client = CacheClient::builder(MsgPackCodec)
//!         .local(Arc::new(BoundedCache::new(10_000)))
//!         .remote(Arc::new(remote))
//!         .build();
//!
//!     client.set("user:1", "Ada Lovelace").await?;
//!     let name: String = client.get("user:1").await?;
//!     println!("cached: {name}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod error;
pub mod local;
pub mod remote;

pub use client::{CacheClient, CacheClientBuilder, RemoteTimeout};
pub use codec::{Codec, JsonCodec, MsgPackCodec, PooledMsgPackCodec};
pub use error::{BoxError, CacheError, Result, Tier};
pub use local::{BoundedCache, LocalCache, MemoryCache};
pub use remote::{HttpRemoteCache, HttpRemoteConfig, RemoteCache};

// Re-export async_trait so adapter implementations don't need the direct
// dependency.
pub use async_trait::async_trait;
