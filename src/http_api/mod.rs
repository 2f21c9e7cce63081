use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    Direction, ProgressReport, ProjectSession, SessionError, Task, TaskId, TaskRecord,
    TransferError, transfer,
};

#[derive(Clone)]
pub struct AppState {
    session: Arc<RwLock<ProjectSession>>,
    show_labels: bool,
}

impl AppState {
    pub fn new(session: ProjectSession) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            show_labels: false,
        }
    }

    pub fn with_labels(mut self, show_labels: bool) -> Self {
        self.show_labels = show_labels;
        self
    }

    fn session(&self) -> Arc<RwLock<ProjectSession>> {
        self.session.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<SessionError> for ApiError {
    fn from(value: SessionError) -> Self {
        match value {
            SessionError::TaskNotFound(_) => ApiError::NotFound(value.to_string()),
            SessionError::InvalidTask(_) => ApiError::Invalid(value.to_string()),
        }
    }
}

impl From<TransferError> for ApiError {
    fn from(value: TransferError) -> Self {
        match value {
            TransferError::SchemaMismatch { .. } | TransferError::ParseFailure(_) => {
                ApiError::Invalid(value.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ReorderPayload {
    task_ids: Vec<TaskId>,
    direction: Direction,
}

#[derive(Debug, Deserialize)]
struct ChartQuery {
    labels: Option<bool>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/reorder", post(reorder_tasks))
        .route("/tasks/import", post(import_tasks))
        .route("/tasks/export", get(export_tasks))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/progress", get(get_progress))
        .route("/progress/export", get(export_progress))
        .route("/chart", get(get_chart))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    let session = state.session();
    let tasks = session.read().tasks().to_vec();
    Json(tasks)
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<u64>,
) -> Result<Json<Task>, ApiError> {
    let id = TaskId(task_id);
    let session = state.session();
    let task = session.read().task(id).cloned();
    task.map(Json)
        .ok_or_else(|| SessionError::TaskNotFound(id).into())
}

async fn create_task(
    State(state): State<AppState>,
    Json(record): Json<TaskRecord>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let session = state.session();
    let created = {
        let mut guard = session.write();
        let (id, _) = guard.add_task(record)?;
        guard
            .task(id)
            .cloned()
            .ok_or_else(|| ApiError::internal("task not found after creation"))?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<u64>,
    Json(record): Json<TaskRecord>,
) -> Result<Json<Task>, ApiError> {
    let id = TaskId(task_id);
    let session = state.session();
    let updated = {
        let mut guard = session.write();
        guard.edit_task(id, record)?;
        guard
            .task(id)
            .cloned()
            .ok_or_else(|| ApiError::internal("task not found after update"))?
    };
    Ok(Json(updated))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    let session = state.session();
    session.write().remove_task(TaskId(task_id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reorder_tasks(
    State(state): State<AppState>,
    Json(payload): Json<ReorderPayload>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let session = state.session();
    let snapshot = session
        .write()
        .reorder_ids(&payload.task_ids, payload.direction)?;
    Ok(Json(snapshot.tasks))
}

async fn import_tasks(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<Vec<Task>>, ApiError> {
    let records = transfer::read_tasks_csv(body.as_bytes())?;
    let session = state.session();
    let snapshot = session.write().import_tasks(records);
    Ok(Json(snapshot.tasks))
}

async fn export_tasks(State(state): State<AppState>) -> Result<Response, ApiError> {
    let session = state.session();
    let tasks = session.read().tasks().to_vec();
    let mut buf = Vec::new();
    transfer::write_tasks_csv(&tasks, &mut buf)?;
    csv_response(buf)
}

async fn get_progress(State(state): State<AppState>) -> Json<ProgressReport> {
    let session = state.session();
    let report = session.read().report();
    Json(report)
}

async fn export_progress(State(state): State<AppState>) -> Result<Response, ApiError> {
    let session = state.session();
    let report = session.read().report();
    let mut buf = Vec::new();
    transfer::write_progress_csv(&report, &mut buf)?;
    csv_response(buf)
}

async fn get_chart(State(state): State<AppState>, Query(query): Query<ChartQuery>) -> Response {
    let show_labels = query.labels.unwrap_or(state.show_labels);
    let session = state.session();
    let chart = session.read().chart(show_labels);
    match chart {
        Some(chart) => Json(chart).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

fn csv_response(buf: Vec<u8>) -> Result<Response, ApiError> {
    let body = String::from_utf8(buf).map_err(|err| ApiError::internal(err.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body).into_response())
}
