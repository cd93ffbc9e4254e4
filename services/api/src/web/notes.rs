//! services/api/src/web/notes.rs
//!
//! Axum handlers for the local notes endpoints. Every handler goes through the
//! shared `NoteStore`; listing derives its order from the query engine.

use crate::web::rest::{api_error, ApiFailure};
use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use mindinote_core::{
    category_counts, filter_and_sort, Category, CategoryFilter, Note, NoteUpdate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A note as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    /// One of `ideas`, `tasks`, `meetings`, `personal`, `work`.
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_pinned: bool,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            category: note.category.to_string(),
            created_at: note.created_at,
            updated_at: note.updated_at,
            is_pinned: note.is_pinned,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListNotesResponse {
    pub notes: Vec<NoteResponse>,
    /// Notes per category, plus `all` for the total.
    pub counts: BTreeMap<String, usize>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListNotesQuery {
    /// A category, or `all` (the default).
    pub category: Option<String>,
    /// Case-insensitive text matched against title and content.
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Defaults to `ideas`.
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub is_pinned: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    pub summary: String,
}

fn parse_category(raw: &str) -> Result<Category, ApiFailure> {
    raw.parse()
        .map_err(|e: mindinote_core::UnknownCategory| api_error(StatusCode::BAD_REQUEST, e.to_string()))
}

fn not_found(id: &str) -> ApiFailure {
    api_error(StatusCode::NOT_FOUND, format!("Note '{}' not found", id))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// List notes, filtered by category and search text.
///
/// Pinned notes come first, then the most recently updated.
#[utoipa::path(
    get,
    path = "/notes",
    params(ListNotesQuery),
    responses(
        (status = 200, description = "The filtered, ordered notes", body = ListNotesResponse),
        (status = 400, description = "Unknown category", body = crate::web::rest::ErrorResponse)
    )
)]
pub async fn list_notes_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ListNotesQuery>,
) -> Result<impl IntoResponse, ApiFailure> {
    let filter = match query.category.as_deref() {
        None | Some("") => CategoryFilter::All,
        Some(raw) => raw
            .parse::<CategoryFilter>()
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?,
    };

    let snapshot = app_state.notes.lock().await.notes();
    let view = filter_and_sort(&snapshot, filter, query.q.as_deref().unwrap_or(""));

    let counts = category_counts(&snapshot);
    let mut count_map: BTreeMap<String, usize> = counts
        .per_category
        .iter()
        .map(|(category, n)| (category.to_string(), *n))
        .collect();
    count_map.insert("all".to_string(), counts.total);

    Ok(Json(ListNotesResponse {
        notes: view.into_iter().map(NoteResponse::from).collect(),
        counts: count_map,
    }))
}

/// Create a note.
#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = NoteResponse),
        (status = 400, description = "Unknown category", body = crate::web::rest::ErrorResponse)
    )
)]
pub async fn create_note_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    let category = match req.category.as_deref() {
        Some(raw) => parse_category(raw)?,
        None => Category::default(),
    };

    let note = app_state
        .notes
        .lock()
        .await
        .add_note(&req.title, &req.content, category);
    info!(id = %note.id, category = %note.category, "Note created");

    Ok((StatusCode::CREATED, Json(NoteResponse::from(note))))
}

/// Update some fields of a note.
#[utoipa::path(
    patch,
    path = "/notes/{id}",
    request_body = UpdateNoteRequest,
    params(("id" = String, Path, description = "The note id")),
    responses(
        (status = 200, description = "Note updated", body = NoteResponse),
        (status = 400, description = "Unknown category", body = crate::web::rest::ErrorResponse),
        (status = 404, description = "No note with that id", body = crate::web::rest::ErrorResponse)
    )
)]
pub async fn update_note_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    let update = NoteUpdate {
        title: req.title,
        content: req.content,
        category: req.category.as_deref().map(parse_category).transpose()?,
        is_pinned: req.is_pinned,
    };

    let note = app_state
        .notes
        .lock()
        .await
        .update_note(&id, update)
        .ok_or_else(|| not_found(&id))?;

    Ok(Json(NoteResponse::from(note)))
}

/// Delete a note. Deleting a note that does not exist also succeeds.
#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(("id" = String, Path, description = "The note id")),
    responses((status = 204, description = "Note deleted or already absent"))
)]
pub async fn delete_note_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    if app_state.notes.lock().await.delete_note(&id) {
        info!(id = %id, "Note deleted");
    }
    StatusCode::NO_CONTENT
}

/// Pin or unpin a note.
#[utoipa::path(
    post,
    path = "/notes/{id}/pin",
    params(("id" = String, Path, description = "The note id")),
    responses(
        (status = 200, description = "Pin state flipped", body = NoteResponse),
        (status = 404, description = "No note with that id", body = crate::web::rest::ErrorResponse)
    )
)]
pub async fn toggle_pin_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiFailure> {
    let note = app_state
        .notes
        .lock()
        .await
        .toggle_pin(&id)
        .ok_or_else(|| not_found(&id))?;

    Ok(Json(NoteResponse::from(note)))
}

/// Summarize the content of a note with the backend's AI service.
#[utoipa::path(
    post,
    path = "/notes/{id}/summarize",
    params(("id" = String, Path, description = "The note id")),
    responses(
        (status = 200, description = "Summary generated", body = SummaryResponse),
        (status = 404, description = "No note with that id", body = crate::web::rest::ErrorResponse),
        (status = 502, description = "The backend failed", body = crate::web::rest::ErrorResponse)
    )
)]
pub async fn summarize_note_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiFailure> {
    // The lock is released before the backend call.
    let content = app_state
        .notes
        .lock()
        .await
        .get(&id)
        .map(|note| note.content)
        .ok_or_else(|| not_found(&id))?;

    let summary = app_state.summarizer.summarize(&content).await.map_err(|e| {
        error!("Failed to summarize note {}: {:?}", id, e);
        api_error(StatusCode::BAD_GATEWAY, e.to_string())
    })?;

    Ok(Json(SummaryResponse { summary }))
}
