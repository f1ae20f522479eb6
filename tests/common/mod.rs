//! Shared helpers for integration tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use admin_finder::ScanOptions;
use tokio::net::TcpListener;

/// Options suited to a local mock server: short timeout, small pool.
pub fn test_options() -> ScanOptions {
    ScanOptions { concurrency: 8, per_host_concurrency: 4, timeout_secs: 5.0, ..ScanOptions::default() }
}

/// Strip the scheme so the scanner has to add it back, like a user typing `example.com`.
pub fn bare_host(uri: &str) -> String {
    uri.trim_start_matches("http://").to_string()
}

/// A listener that accepts connections and closes them without answering.
/// Returns the base URL and a counter of accepted connections.
pub async fn hangup_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            drop(stream);
        }
    });
    (format!("http://{addr}"), accepted)
}
