use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use super::AppState;
use crate::error::AppError;
use crate::models::{AddTaskRequest, CompleteTaskRequest, TasksQuery, User};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(get_tasks))
        .route("/tasks/add", post(add_task))
        .route("/tasks/complete", post(complete_task))
}

async fn load_user(state: &AppState, telegram_id: &str) -> Result<User, AppError> {
    state
        .store
        .find_user(telegram_id)
        .await?
        .ok_or_else(AppError::user_not_found)
}

fn invalid_task_data(rejection: JsonRejection) -> AppError {
    tracing::debug!(%rejection, "rejected task body");
    AppError::bad_request("Invalid task data")
}

pub async fn add_task(
    State(state): State<AppState>,
    req: Result<Json<AddTaskRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = req.map_err(invalid_task_data)?;
    let valid = req.validate()?;

    let mut user = load_user(&state, valid.telegram_id).await?;
    user.add_task(valid.task_id, valid.description)?;
    state.store.save_tasks(&user).await?;

    tracing::info!(
        telegram_id = %user.telegram_id,
        task_id = %valid.task_id,
        "task added"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Task added successfully",
        "tasks": user.tasks
    })))
}

pub async fn get_tasks(
    State(state): State<AppState>,
    query: Result<Query<TasksQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query.map_err(|_| AppError::bad_request("Telegram ID is required"))?;
    let telegram_id = query.validate()?;

    let user = load_user(&state, telegram_id).await?;

    Ok(Json(json!({ "success": true, "tasks": user.tasks })))
}

pub async fn complete_task(
    State(state): State<AppState>,
    req: Result<Json<CompleteTaskRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = req.map_err(invalid_task_data)?;
    let (telegram_id, task_id) = req.validate()?;

    let mut user = load_user(&state, telegram_id).await?;
    user.complete_task(task_id)?;
    state.store.save_tasks(&user).await?;

    tracing::info!(telegram_id = %user.telegram_id, task_id = %task_id, "task completed");

    Ok(Json(json!({
        "success": true,
        "message": "Task marked as complete",
        "tasks": user.tasks
    })))
}
