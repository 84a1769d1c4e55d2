use api_types::{Success, progress::UpdateProgress};
use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{ServerError, require_telegram_user_id, server::ServerState};

/// Store the caller's progress, creating the user first if needed.
pub async fn update(
    State(state): State<ServerState>,
    payload: Result<Json<UpdateProgress>, JsonRejection>,
) -> Result<Json<Success>, ServerError> {
    let Json(payload) = payload?;
    let telegram_user_id = require_telegram_user_id(payload.telegram_user_id.as_deref())?;
    let Some(progress) = payload.progress else {
        return Err(ServerError::Generic("Progress must be a number".to_string()));
    };

    state
        .engine
        .get_or_create(telegram_user_id, None, None)
        .await?;
    let success = state
        .engine
        .update_progress(telegram_user_id, progress)
        .await?;

    Ok(Json(Success { success }))
}
