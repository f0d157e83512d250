use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::*;
use crate::store::Store;

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
/// The full error is logged server-side for debugging, but clients only
/// see a generic message to avoid leaking internal details.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Tasks
// ============================================================

/// Query parameters selecting a user's records by email.
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub email: Option<String>,
}

impl OwnerQuery {
    fn require_email(self) -> Result<String, (StatusCode, String)> {
        self.email
            .filter(|email| !email.trim().is_empty())
            .ok_or((
                StatusCode::BAD_REQUEST,
                "The email parameter is required".to_string(),
            ))
    }
}

pub async fn list_tasks(
    State(store): State<Store>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<Task>>, (StatusCode, String)> {
    let email = query.require_email()?;
    let tasks = store.read_tasks().map_err(internal_error)?;
    Ok(Json(
        tasks.into_iter().filter(|task| task.email == email).collect(),
    ))
}

pub async fn create_task(
    State(store): State<Store>,
    Json(input): Json<CreateTaskInput>,
) -> Result<(StatusCode, Json<Task>), (StatusCode, String)> {
    if input.email.trim().is_empty() || input.description.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Email and description are required".to_string(),
        ));
    }

    store
        .create_task(input)
        .map(|task| (StatusCode::CREATED, Json(task)))
        .map_err(internal_error)
}

pub async fn update_task(
    State(store): State<Store>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTaskInput>,
) -> Result<Json<Task>, (StatusCode, String)> {
    store
        .set_task_completed(id, input.completed)
        .map_err(internal_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Task not found".to_string()))
}

pub async fn delete_task(
    State(store): State<Store>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if store.delete_task(id).map_err(internal_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Task not found".to_string()))
    }
}

// ============================================================
// Notification preferences
// ============================================================

pub async fn get_preference(
    State(store): State<Store>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<UserPreference>, (StatusCode, String)> {
    let email = query.require_email()?;
    store
        .get_preference(&email)
        .map_err(internal_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Preference not found".to_string()))
}

pub async fn set_preference(
    State(store): State<Store>,
    Json(input): Json<SetPreferenceInput>,
) -> Result<Json<UserPreference>, (StatusCode, String)> {
    if input.email.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Email is required".to_string()));
    }

    let Some(notification_time) = normalize_notification_time(&input.notification_time) else {
        return Err((
            StatusCode::BAD_REQUEST,
            "notification_time must be a valid HH:MM time".to_string(),
        ));
    };

    store
        .upsert_preference(SetPreferenceInput {
            email: input.email,
            notification_time,
        })
        .map(Json)
        .map_err(internal_error)
}
