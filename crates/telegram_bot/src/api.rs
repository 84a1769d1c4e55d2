use api_types::user::{UserData, UserDataRequest};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
}

impl ApiClient {
    pub(crate) fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn post_json<TReq: serde::Serialize + ?Sized, TResp: for<'de> serde::Deserialize<'de>>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TResp, ApiError> {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<TResp>().await?);
        }

        let message = match resp.json::<ErrorBody>().await {
            Ok(err) => err.error,
            Err(_) => "server error".to_string(),
        };
        Err(ApiError::Server { status, message })
    }

    /// Create (or refresh) the player, linking them to the owner of
    /// `referral_code` when given.
    pub(crate) async fn register(
        &self,
        telegram_user_id: u64,
        username: Option<&str>,
        referral_code: Option<&str>,
    ) -> Result<UserData, ApiError> {
        self.post_json(
            "/api/getUserData",
            &UserDataRequest {
                telegram_user_id: Some(telegram_user_id.to_string()),
                username: username.map(ToString::to_string),
                referral_code: referral_code.map(ToString::to_string),
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let api = ApiClient::new(Client::new(), "http://127.0.0.1:3000/".to_string());
        assert_eq!(
            api.url("/api/getUserData"),
            "http://127.0.0.1:3000/api/getUserData"
        );
    }

    #[test]
    fn register_body_matches_server_contract() {
        let body = serde_json::to_value(UserDataRequest {
            telegram_user_id: Some(42u64.to_string()),
            username: Some("alice".to_string()),
            referral_code: None,
        })
        .unwrap();
        assert_eq!(body["telegramUserId"], "42");
        assert_eq!(body["username"], "alice");
    }
}
