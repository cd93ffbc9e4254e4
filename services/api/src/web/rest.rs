//! services/api/src/web/rest.rs
//!
//! Contains the master definition for the OpenAPI specification and the error body
//! shared by the REST handlers.

use crate::web::{auth, notes, proxy};
use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        notes::list_notes_handler,
        notes::create_note_handler,
        notes::update_note_handler,
        notes::delete_note_handler,
        notes::toggle_pin_handler,
        notes::summarize_note_handler,
        auth::signup_handler,
        auth::demo_handler,
        proxy::proxy_handler,
    ),
    components(
        schemas(
            notes::NoteResponse,
            notes::ListNotesResponse,
            notes::CreateNoteRequest,
            notes::UpdateNoteRequest,
            notes::SummaryResponse,
            auth::SignupRequest,
            auth::AuthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "MindiNote API", description = "Local notes, account helpers and the backend forwarding proxy.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Shared Error Body
//=========================================================================================

/// The JSON body sent with every error status.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// The error half of every REST handler's result.
pub type ApiFailure = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiFailure {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}
