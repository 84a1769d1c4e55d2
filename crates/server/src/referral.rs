use api_types::referral::{Referral, Referrals, ReferralsQuery};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::{ServerError, require_telegram_user_id, server::ServerState};

/// List the users who joined with the caller's referral code.
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ReferralsQuery>, QueryRejection>,
) -> Result<Json<Referrals>, ServerError> {
    let Query(query) = query?;
    let telegram_user_id = require_telegram_user_id(query.telegram_user_id.as_deref())?;

    let referrals = state
        .engine
        .referrals(telegram_user_id)
        .await?
        .into_iter()
        .map(|entry| Referral {
            telegram_user_id: entry.telegram_user_id,
            username: entry.username,
            balance: entry.balance,
        })
        .collect();

    Ok(Json(Referrals { referrals }))
}
