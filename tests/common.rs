//! Common test utilities

use mockito::{Server, ServerGuard};
use std::time::Duration;
use tiercache::{HttpRemoteCache, HttpRemoteConfig};

/// Create a mock remote cache server for testing
#[allow(dead_code)] // Used by other test modules
pub async fn create_mock_server() -> ServerGuard {
    Server::new_async().await
}

/// Setup an HTTP remote adapter pointing to a mock server
#[allow(dead_code)] // Used by other test modules
pub async fn setup_http_remote() -> (HttpRemoteCache, ServerGuard) {
    let server = create_mock_server().await;
    let config = HttpRemoteConfig::new(server.url()).with_timeout(Duration::from_secs(5));
    let remote = HttpRemoteCache::new(config).unwrap();
    (remote, server)
}
