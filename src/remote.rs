//! Remote (out-of-process) cache tier
//!
//! The remote tier is the authoritative store shared across process
//! instances. Unlike the local tier it is fallible: transport and protocol
//! failures are surfaced to the cache client, which distinguishes them from
//! a plain "not found".

use crate::error::BoxError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Networked key -> bytes store.
///
/// Absence is `Ok(None)`, never an error; only genuine I/O or protocol
/// failures produce `Err`. Calls may suspend on network I/O and are aborted
/// when the caller drops the future. TTL policy belongs to the
/// implementation.
#[async_trait]
pub trait RemoteCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BoxError>;
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), BoxError>;
    async fn remove(&self, key: &str) -> Result<(), BoxError>;
}

/// Configuration for [`HttpRemoteCache`]
#[derive(Debug, Clone)]
pub struct HttpRemoteConfig {
    /// Base URL of the remote cache service
    pub base_url: String,
    /// Per-request timeout applied by the underlying HTTP client
    pub timeout: Duration,
    /// Entry time-to-live in seconds, sent with every write; `None` lets
    /// the server apply its default
    pub ttl_secs: Option<u64>,
    /// Optional bearer token sent with every request
    pub auth_token: Option<String>,
}

impl HttpRemoteConfig {
    /// Create a new configuration with the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            ttl_secs: None,
            auth_token: None,
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the entry time-to-live in seconds
    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = Some(ttl_secs);
        self
    }

    /// Set the authentication token
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

/// HTTP-backed remote cache adapter.
///
/// Speaks a minimal REST key/value protocol:
///
/// - `GET /cache/{key}` — payload bytes in the body, `404` for absent keys
/// - `PUT /cache/{key}?ttl=N` — payload bytes in the body
/// - `DELETE /cache/{key}` — `404` is tolerated so removal stays idempotent
///
/// Keys are placed in a single percent-encoded path segment, so arbitrary
/// key strings are safe.
#[derive(Clone)]
pub struct HttpRemoteCache {
    http_client: Client,
    base_url: Url,
    ttl_secs: Option<u64>,
}

impl HttpRemoteCache {
    /// Build the adapter from its configuration.
    ///
    /// Fails on an unparseable base URL or an invalid auth token.
    pub fn new(config: HttpRemoteConfig) -> Result<Self, BoxError> {
        let base_url = Url::parse(&config.base_url)?;

        let mut http_client_builder = Client::builder().timeout(config.timeout);

        if let Some(ref token) = config.auth_token {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token).parse()?,
            );
            http_client_builder = http_client_builder.default_headers(headers);
        }

        Ok(Self {
            http_client: http_client_builder.build()?,
            base_url,
            ttl_secs: config.ttl_secs,
        })
    }

    fn entry_url(&self, key: &str) -> Result<Url, BoxError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| "remote base URL cannot be a base")?
            .pop_if_empty()
            .push("cache")
            .push(key);
        Ok(url)
    }
}

#[async_trait]
impl RemoteCache for HttpRemoteCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BoxError> {
        let url = self.entry_url(key)?;
        let response = self.http_client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response.error_for_status()?;
        Ok(Some(response.bytes().await?.to_vec()))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), BoxError> {
        let mut url = self.entry_url(key)?;
        if let Some(ttl) = self.ttl_secs {
            url.query_pairs_mut().append_pair("ttl", &ttl.to_string());
        }

        let response = self.http_client.put(url).body(value.to_vec()).send().await?;
        response.error_for_status()?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), BoxError> {
        let url = self.entry_url(key)?;
        let response = self.http_client.delete(url).send().await?;

        // Removing a key the server never held is a success.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        response.error_for_status()?;
        Ok(())
    }
}
