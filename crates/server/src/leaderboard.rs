use api_types::leaderboard::{Leaderboard, LeaderboardQuery, Player};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::{
    ServerError,
    server::{DEFAULT_LEADERBOARD, ServerState},
};

pub async fn get(
    State(state): State<ServerState>,
    query: Result<Query<LeaderboardQuery>, QueryRejection>,
) -> Result<Json<Leaderboard>, ServerError> {
    let Query(query) = query?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD)
        .min(state.max_leaderboard);

    let players = state
        .engine
        .top_players(limit)
        .await?
        .into_iter()
        .map(|entry| Player {
            telegram_user_id: entry.telegram_user_id,
            username: entry.username,
            balance: entry.balance,
        })
        .collect();

    Ok(Json(Leaderboard { players }))
}
