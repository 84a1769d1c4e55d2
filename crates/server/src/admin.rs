//! Database download and replacement, behind the admin key.

use api_types::admin::Restored;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::{ServerError, server::ServerState};

const BACKUP_FILENAME: &str = "tap_game.db";

pub async fn download(State(state): State<ServerState>) -> Result<Response, ServerError> {
    let bytes = state.engine.backup().await?;
    let disposition = format!("attachment; filename=\"{BACKUP_FILENAME}\"");

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

pub async fn upload(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<Json<Restored>, ServerError> {
    let restored = state.engine.restore(&body).await?;
    Ok(Json(Restored { restored }))
}
