//! Test server harness for E2E testing
//!
//! Provides `TestBrokerServer` for spawning real broker instances in tests.

use broker_service::config::Config;
use broker_service::routes::{self, AppState};
use broker_service::sources::CredentialResolver;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the broker server in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_token_flow_e2e() -> Result<()> {
///     let vars = HashMap::from([
///         ("TOKEN_ISSUER_URL".to_string(), issuer.uri()),
///     ]);
///     let server = TestBrokerServer::spawn(vars).await?;
///     let client = reqwest::Client::new();
///
///     let response = client
///         .post(format!("{}/token", server.url()))
///         .json(&serde_json::json!({"roomName": "r", "participantName": "p"}))
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestBrokerServer {
    addr: SocketAddr,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestBrokerServer {
    /// Spawn a new test server instance.
    ///
    /// The server will:
    /// - Build its configuration from `vars` (credential source settings
    ///   come from the caller; nothing is read from the process environment)
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Start the HTTP server in the background
    ///
    /// # Arguments
    /// * `vars` - Configuration variables, as `Config::from_vars` expects
    ///
    /// # Returns
    /// * `Ok(TestBrokerServer)` - Running server instance
    /// * `Err(anyhow::Error)` - If server spawn fails
    pub async fn spawn(mut vars: HashMap<String, String>) -> Result<Self, anyhow::Error> {
        vars.entry("BIND_ADDRESS".to_string())
            .or_insert_with(|| "127.0.0.1:0".to_string());
        vars.entry("BROKER_ID".to_string())
            .or_insert_with(|| "broker-test-001".to_string());
        // Keep attempts fast so failure-path tests don't sit in timeouts
        vars.entry("SOURCE_TIMEOUT_SECS".to_string())
            .or_insert_with(|| "2".to_string());

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let resolver = CredentialResolver::from_config(&config)
            .map_err(|e| anyhow::anyhow!("Failed to build resolver: {}", e))?;

        let state = Arc::new(AppState {
            config: config.clone(),
            resolver,
        });

        // Build routes using the broker's real route builder
        let app = routes::build_routes(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        // Spawn server in background
        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestBrokerServer {
    fn drop(&mut self) {
        // Explicitly abort the HTTP server task to ensure immediate cleanup
        // when the test completes.
        self._handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_spawns_successfully() -> Result<(), anyhow::Error> {
        let server = TestBrokerServer::spawn(HashMap::new()).await?;

        // Verify server is accessible
        assert!(server.url().starts_with("http://127.0.0.1:"));

        // Verify health endpoint works
        let response = reqwest::get(format!("{}/health", server.url())).await?;
        assert_eq!(response.status(), 200);

        // Verify response body
        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["status"], "healthy");

        Ok(())
    }

    #[tokio::test]
    async fn test_server_provides_addr() -> Result<(), anyhow::Error> {
        let server = TestBrokerServer::spawn(HashMap::new()).await?;

        let addr = server.addr();

        // Should be localhost with a non-zero port
        assert!(addr.ip().is_loopback());
        assert!(addr.port() > 0);

        // Verify addr matches url
        let expected_url = format!("http://{}", addr);
        assert_eq!(server.url(), expected_url);

        Ok(())
    }

    #[tokio::test]
    async fn test_server_provides_config_access() -> Result<(), anyhow::Error> {
        let vars = HashMap::from([(
            "HARDCODED_SERVER_URL".to_string(),
            "wss://media.test".to_string(),
        )]);
        let server = TestBrokerServer::spawn(vars).await?;

        let config = server.config();

        assert_eq!(config.broker_id, "broker-test-001");
        assert_eq!(
            config.hardcoded_server_url,
            Some("wss://media.test".to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_multiple_servers_different_ports() -> Result<(), anyhow::Error> {
        let server1 = TestBrokerServer::spawn(HashMap::new()).await?;
        let server2 = TestBrokerServer::spawn(HashMap::new()).await?;

        // Verify both servers have different addresses
        assert_ne!(server1.addr(), server2.addr());

        // Verify both servers are accessible
        let response1 = reqwest::get(format!("{}/health", server1.url())).await?;
        assert_eq!(response1.status(), 200);

        let response2 = reqwest::get(format!("{}/health", server2.url())).await?;
        assert_eq!(response2.status(), 200);

        Ok(())
    }
}
