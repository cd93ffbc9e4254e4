//! services/api/src/web/auth.rs
//!
//! Account endpoints. Both forward to the backend and keep the returned opaque
//! user id in local storage; there is no session beyond that identifier.

use crate::web::rest::{api_error, ApiFailure};
use crate::web::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use mindinote_core::ports::NoteStorage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;

/// Storage slot holding the current user's id.
pub const USER_ID_KEY: &str = "userId";
/// Storage slot holding the current user's email.
pub const USER_EMAIL_KEY: &str = "userEmail";

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_new: bool,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Register with the backend and remember the user id
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User ready", body = AuthResponse),
        (status = 400, description = "Email, name or password missing", body = crate::web::rest::ErrorResponse),
        (status = 502, description = "The backend refused or failed", body = crate::web::rest::ErrorResponse)
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    if [&req.email, &req.name, &req.password]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Email, name and password are required",
        ));
    }

    let outcome = state
        .accounts
        .signup(&req.email, &req.name, &req.password)
        .await
        .map_err(|e| {
            error!("Signup failed: {:?}", e);
            api_error(StatusCode::BAD_GATEWAY, e.to_string())
        })?;

    remember(state.storage.as_ref(), USER_ID_KEY, &outcome.user_id);
    remember(state.storage.as_ref(), USER_EMAIL_KEY, &outcome.email);
    info!(user_id = %outcome.user_id, is_new = outcome.is_new, "User signed up");

    Ok(Json(AuthResponse {
        user_id: outcome.user_id,
        email: Some(outcome.email),
        is_new: outcome.is_new,
    }))
}

/// POST /auth/demo - Use the backend's shared demo user
#[utoipa::path(
    post,
    path = "/auth/demo",
    responses(
        (status = 200, description = "Demo user ready", body = AuthResponse),
        (status = 502, description = "The backend refused or failed", body = crate::web::rest::ErrorResponse)
    )
)]
pub async fn demo_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiFailure> {
    let user_id = state.accounts.demo_user().await.map_err(|e| {
        error!("Failed to get demo user: {:?}", e);
        api_error(StatusCode::BAD_GATEWAY, e.to_string())
    })?;

    remember(state.storage.as_ref(), USER_ID_KEY, &user_id);

    Ok(Json(AuthResponse {
        user_id,
        email: None,
        is_new: false,
    }))
}

/// Stores `value` as is. A failed write is logged and otherwise ignored.
fn remember(storage: &dyn NoteStorage, key: &str, value: &str) {
    if let Err(e) = storage.write(key, value) {
        warn!("Failed to store {}: {}", key, e);
    }
}
