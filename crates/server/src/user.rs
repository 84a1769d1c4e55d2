//! First contact and steady-state reads of a player.

use api_types::user::{UserData, UserDataRequest};
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use engine::Fetched;

use crate::{ServerError, require_telegram_user_id, server::ServerState};

/// Return the caller's data, creating the user on first contact.
pub async fn get_user_data(
    State(state): State<ServerState>,
    payload: Result<Json<UserDataRequest>, JsonRejection>,
) -> Result<Json<UserData>, ServerError> {
    let Json(payload) = payload?;
    let telegram_user_id = require_telegram_user_id(payload.telegram_user_id.as_deref())?;

    let fetched = state
        .engine
        .get_or_create(
            telegram_user_id,
            payload.username.as_deref(),
            payload.referral_code.as_deref(),
        )
        .await?;

    Ok(Json(user_data(fetched)))
}

fn user_data(fetched: Fetched) -> UserData {
    let created = fetched.is_created();
    let user = fetched.into_user();
    UserData {
        telegram_user_id: user.telegram_user_id,
        username: user.username,
        balance: user.balance,
        progress: user.progress,
        referral_code: user.referral_code,
        referred_by: user.referred_by,
        created,
    }
}
