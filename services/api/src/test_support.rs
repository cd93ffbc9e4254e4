//! Helpers shared by the service's tests.

use crate::adapters::{BackendClient, JsonFileStorage};
use crate::config::Config;
use crate::web::{self, state::AppState};
use axum::{response::Response, Router};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// The application router over a fresh data directory, talking to `backend_url`.
/// The directory lives as long as the returned `TempDir`.
pub fn test_app(backend_url: &str) -> (Router, TempDir) {
    let (app, _storage, dir) = test_app_with_storage(backend_url);
    (app, dir)
}

pub fn test_app_with_storage(backend_url: &str) -> (Router, Arc<JsonFileStorage>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::from_lookup(|key| match key {
        "BACKEND_URL" => Some(backend_url.to_string()),
        "DATA_DIR" => Some(dir.path().display().to_string()),
        _ => None,
    })
    .unwrap();

    let storage = Arc::new(JsonFileStorage::new(&config.data_dir));
    let backend =
        Arc::new(BackendClient::new(&config.backend_url, Duration::from_secs(5)).unwrap());
    let state = AppState::new(storage.clone(), backend);
    (web::router(Arc::new(state)), storage, dir)
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
