pub mod auth;
pub mod notes;
pub mod proxy;
pub mod rest;
pub mod state;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{any, get, patch, post},
    Router,
};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

// Re-export the handlers to make them easily accessible to the binary that builds
// the web server router.
pub use auth::{demo_handler, signup_handler};
pub use notes::{
    create_note_handler, delete_note_handler, list_notes_handler, summarize_note_handler,
    toggle_pin_handler, update_note_handler,
};
pub use proxy::proxy_handler;

/// Builds the application router: the notes and account routes behind a CORS layer,
/// and the forwarding proxy, which answers its own preflight requests.
pub fn router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/notes", get(list_notes_handler).post(create_note_handler))
        .route("/notes/{id}", patch(update_note_handler).delete(delete_note_handler))
        .route("/notes/{id}/pin", post(toggle_pin_handler))
        .route("/notes/{id}/summarize", post(summarize_note_handler))
        .route("/auth/signup", post(signup_handler))
        .route("/auth/demo", post(demo_handler))
        .layer(cors);

    Router::new()
        .merge(api_routes)
        .route("/api/proxy", any(proxy_handler))
        .with_state(app_state)
}
