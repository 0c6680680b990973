//! Local HTTP stub servers for adapter tests.

use axum::Router;
use tokio::net::TcpListener;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub(crate) async fn spawn_stub(router: Router) -> String {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(error) => panic!("failed to bind stub server: {error}"),
    };
    let address = match listener.local_addr() {
        Ok(address) => address,
        Err(error) => panic!("failed to read stub server address: {error}"),
    };

    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router).await {
            panic!("stub server failed: {error}");
        }
    });

    format!("http://{address}")
}
