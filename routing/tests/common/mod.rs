use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::Router;

/// Query strings seen by the stub provider, decoded.
pub type Recorded = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_provider(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub async fn closed_port() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
