use api_types::{
    Success,
    balance::{Balance, IncrementBalance, UpdateBalance},
};
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use engine::EngineError;

use crate::{ServerError, require_telegram_user_id, server::ServerState};

/// Add one token to the caller's balance.
///
/// The user is created first if needed, then the balance is incremented in
/// the database so concurrent taps are never lost.
pub async fn increment(
    State(state): State<ServerState>,
    payload: Result<Json<IncrementBalance>, JsonRejection>,
) -> Result<Json<Balance>, ServerError> {
    let Json(payload) = payload?;
    let telegram_user_id = require_telegram_user_id(payload.telegram_user_id.as_deref())?;

    state
        .engine
        .get_or_create(telegram_user_id, None, None)
        .await?;
    let balance = state
        .engine
        .increment_balance(telegram_user_id, 1)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(telegram_user_id.to_string()))?;

    Ok(Json(Balance { balance }))
}

/// Overwrite the caller's balance. Unknown users are reported with
/// `success: false`.
pub async fn update(
    State(state): State<ServerState>,
    payload: Result<Json<UpdateBalance>, JsonRejection>,
) -> Result<Json<Success>, ServerError> {
    let Json(payload) = payload?;
    let telegram_user_id = require_telegram_user_id(payload.telegram_user_id.as_deref())?;
    let Some(balance) = payload.balance else {
        return Err(ServerError::Generic("Balance must be a number".to_string()));
    };

    let success = state.engine.update_balance(telegram_user_id, balance).await?;
    Ok(Json(Success { success }))
}
