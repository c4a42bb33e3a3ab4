use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{routing::post, Json, Router};
use serde_json::{json, Map, Value};

use super::AppState;
use crate::{error::AppError, models::NewUser, telegram};

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth", post(authorize))
}

/// Verifies a Telegram login payload and returns the user, creating it on first login.
pub async fn authorize(
    State(state): State<AppState>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "rejected auth body");
        AppError::bad_request("Invalid request body")
    })?;

    let fields = telegram::verify(&state.bot_token, &payload).map_err(|err| {
        tracing::warn!(error = %err, "telegram login verification failed");
        AppError::from(err)
    })?;

    let new_user = NewUser::from_login_fields(&fields)
        .ok_or_else(|| AppError::bad_request("Telegram ID is required"))?;

    let (user, created) = state.store.find_or_create_user(new_user).await?;
    if created {
        tracing::info!(telegram_id = %user.telegram_id, "created user");
    }

    Ok(Json(json!({
        "success": true,
        "message": "Authorization successful",
        "user": user
    })))
}
