//! services/api/src/web/proxy.rs
//!
//! The forwarding proxy. Relays analysis requests to the backend so a browser on
//! another origin can reach it, adding permissive cross-origin headers.

use crate::web::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        Method, StatusCode,
    },
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error};

const ANY_ORIGIN: (axum::http::HeaderName, &str) = (ACCESS_CONTROL_ALLOW_ORIGIN, "*");

/// Relay a request to the backend's analysis endpoint.
///
/// `OPTIONS` is answered locally as a CORS preflight, `POST` is forwarded and any
/// other method is refused.
#[utoipa::path(
    post,
    path = "/api/proxy",
    request_body(content = Object, description = "Forwarded as is to the backend's /api/ai/analyze"),
    responses(
        (status = 200, description = "The backend's response, relayed with its own status code"),
        (status = 405, description = "Method not allowed", body = crate::web::rest::ErrorResponse),
        (status = 500, description = "The backend could not be reached", body = crate::web::rest::ErrorResponse)
    )
)]
pub async fn proxy_handler(
    State(app_state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Response {
    match method {
        Method::OPTIONS => preflight(),
        Method::POST => forward(&app_state, &body).await,
        _ => (
            StatusCode::METHOD_NOT_ALLOWED,
            [ANY_ORIGIN],
            Json(json!({ "error": "Method not allowed" })),
        )
            .into_response(),
    }
}

fn preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            ANY_ORIGIN,
            (ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
        ],
    )
        .into_response()
}

async fn forward(app_state: &AppState, body: &[u8]) -> Response {
    // A missing, null or unparseable body is forwarded as an empty object.
    let payload = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Null) | Err(_) => json!({}),
        Ok(value) => value,
    };

    match app_state.backend.relay_analyze(&payload).await {
        Ok((status, data)) => {
            debug!(status = status.as_u16(), "Relaying backend response");
            (status, [ANY_ORIGIN], Json(data)).into_response()
        }
        Err(e) => {
            error!("Failed to forward request to backend: {:?}", e);
            // The client error names the request URL; the backend address stays hidden.
            let message = match e.without_url().to_string() {
                m if m.trim().is_empty() => "Internal error".to_string(),
                m => m,
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [ANY_ORIGIN],
                Json(json!({ "error": message })),
            )
                .into_response()
        }
    }
}
