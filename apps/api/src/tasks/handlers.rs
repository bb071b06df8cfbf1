//! Axum route handlers for the Task API. All endpoints require a session.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::tasks::registry::{TaskKind, TaskSnapshot};

#[derive(Debug, Deserialize)]
pub struct StartTaskRequest {
    pub kind: TaskKind,
}

fn require_session(state: &AppState) -> Result<(), AppError> {
    if state.auth.is_authenticated() {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

/// POST /api/v1/tasks
pub async fn handle_start_task(
    State(state): State<AppState>,
    Json(request): Json<StartTaskRequest>,
) -> Result<(StatusCode, Json<TaskSnapshot>), AppError> {
    require_session(&state)?;
    let snapshot = state.tasks.start(request.kind).await;
    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

/// GET /api/v1/tasks/:id
pub async fn handle_get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskSnapshot>, AppError> {
    require_session(&state)?;
    state
        .tasks
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Task {id} not found")))
}

/// DELETE /api/v1/tasks/:id
pub async fn handle_cancel_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskSnapshot>, AppError> {
    require_session(&state)?;
    state
        .tasks
        .cancel(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Task {id} not found")))
}
