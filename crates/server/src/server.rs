use axum::{
    Router,
    extract::{DefaultBodyLimit, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};

use std::sync::Arc;

use crate::{admin, balance, leaderboard, progress, referral, user};
use engine::Engine;

static ADMIN_KEY_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("admin-key");

/// Upper bound of an uploaded backup.
const MAX_BACKUP_SIZE: usize = 64 * 1024 * 1024;

/// Default number of leaderboard rows.
pub(crate) const DEFAULT_LEADERBOARD: u64 = 100;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Pre-shared key of the admin routes. `None` disables them.
    pub admin_key: Option<String>,
    /// Largest leaderboard a client can ask for.
    pub max_leaderboard: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            admin_key: None,
            max_leaderboard: DEFAULT_LEADERBOARD,
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub admin_key: Option<Arc<str>>,
    pub max_leaderboard: u64,
}

/// `TypedHeader` for the admin key
///
/// Admin requests must contain an "admin-key" entry in the header.
struct AdminKey(String);

impl Header for AdminKey {
    fn name() -> &'static axum::http::HeaderName {
        &ADMIN_KEY_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };

        Ok(AdminKey(value.to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(mut value) => {
                value.set_sensitive(true);
                values.extend(std::iter::once(value));
            }
            Err(_) => tracing::error!("failed to encode admin-key header"),
        }
    }
}

/// Compare without stopping at the first differing byte.
fn keys_match(given: &str, expected: &str) -> bool {
    let (given, expected) = (given.as_bytes(), expected.as_bytes());
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

async fn admin_auth(
    admin_key: Option<TypedHeader<AdminKey>>,
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = state.admin_key.as_deref() else {
        tracing::warn!("admin request rejected: no admin key configured");
        return Err(StatusCode::UNAUTHORIZED);
    };

    match admin_key {
        Some(TypedHeader(AdminKey(given))) if keys_match(&given, expected) => {
            Ok(next.run(request).await)
        }
        _ => {
            tracing::warn!("admin request rejected: wrong or missing key");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

fn router(state: ServerState) -> Router {
    let admin = Router::new()
        .route(
            "/admin/database",
            get(admin::download).post(admin::upload),
        )
        .layer(DefaultBodyLimit::max(MAX_BACKUP_SIZE))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth));

    Router::new()
        .route("/api/getUserData", post(user::get_user_data))
        .route("/api/incrementBalance", post(balance::increment))
        .route("/api/updateBalance", post(balance::update))
        .route("/api/updateProgress", post(progress::update))
        .route("/api/leaderboard", get(leaderboard::get))
        .route("/api/referrals", get(referral::list))
        .merge(admin)
        .with_state(state)
}

/// Build the application router around `engine`.
pub fn app(engine: Engine, config: ServerConfig) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
        admin_key: config.admin_key.map(Arc::from),
        max_leaderboard: config.max_leaderboard.max(1),
    };
    router(state)
}

pub async fn run_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);
    if config.admin_key.is_none() {
        tracing::info!("No admin key configured, admin routes are disabled");
    }

    axum::serve(listener, app(engine, config)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_match_only_on_equal_keys() {
        assert!(keys_match("s3cret", "s3cret"));
        assert!(!keys_match("s3cret", "s3creT"));
        assert!(!keys_match("s3cret", "s3cret!"));
        assert!(!keys_match("", "s3cret"));
    }
}
