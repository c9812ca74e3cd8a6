//! Shared test server fixture.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use fanout_relay::{
    infrastructure::repository::InMemoryConnectionRegistry,
    ui::{router, state::AppState},
};
use tokio::task::JoinHandle;

/// A relay server bound to an ephemeral port for one test.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Bind an ephemeral port and serve the real router on it.
    pub async fn start() -> Self {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let state = Arc::new(AppState::new(registry));
        let app = router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has a local addr");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("test server exited unexpectedly");
        });

        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Poll the connections endpoint until the registry reports `expected`
/// members. Connect and disconnect are processed asynchronously relative
/// to the client side of the socket, so tests synchronize through this.
pub async fn wait_for_connection_count(server: &TestServer, expected: usize) {
    let client = reqwest::Client::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let body: serde_json::Value = client
            .get(format!("{}/api/connections", server.base_url()))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON");
        let count = body.as_array().map(|a| a.len()).unwrap_or_default();
        if count == expected {
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            panic!("timed out waiting for {expected} connections (last saw {count})");
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}
