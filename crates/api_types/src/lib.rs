//! JSON bodies of the HTTP API.
//!
//! Field names are camelCase on the wire, matching the web client.

use serde::{Deserialize, Serialize};

pub mod user {
    use super::*;

    /// Body of `/api/getUserData`.
    ///
    /// `telegram_user_id` is optional so a missing id is reported as a
    /// validation error instead of a deserialization failure.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserDataRequest {
        pub telegram_user_id: Option<String>,
        pub username: Option<String>,
        pub referral_code: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserData {
        pub telegram_user_id: String,
        pub username: Option<String>,
        pub balance: i64,
        pub progress: i64,
        pub referral_code: Option<String>,
        pub referred_by: Option<String>,
        /// `true` on the first contact of this user.
        pub created: bool,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncrementBalance {
        pub telegram_user_id: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UpdateBalance {
        pub telegram_user_id: Option<String>,
        pub balance: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Balance {
        pub balance: i64,
    }
}

pub mod progress {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UpdateProgress {
        pub telegram_user_id: Option<String>,
        pub progress: Option<i64>,
    }
}

pub mod leaderboard {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LeaderboardQuery {
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Player {
        pub telegram_user_id: String,
        pub username: Option<String>,
        pub balance: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Leaderboard {
        pub players: Vec<Player>,
    }
}

pub mod referral {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReferralsQuery {
        pub telegram_user_id: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Referral {
        pub telegram_user_id: String,
        pub username: Option<String>,
        pub balance: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Referrals {
        pub referrals: Vec<Referral>,
    }
}

pub mod admin {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Restored {
        pub restored: u64,
    }
}

/// Body of write endpoints that report whether a user was touched.
#[derive(Debug, Serialize, Deserialize)]
pub struct Success {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_data_request_uses_camel_case() {
        let req: user::UserDataRequest = serde_json::from_str(
            r#"{"telegramUserId":"1001","username":"alice","referralCode":"AB12CD34"}"#,
        )
        .unwrap();
        assert_eq!(req.telegram_user_id.as_deref(), Some("1001"));
        assert_eq!(req.referral_code.as_deref(), Some("AB12CD34"));
    }

    #[test]
    fn missing_id_is_not_a_parse_error() {
        let req: balance::IncrementBalance = serde_json::from_str("{}").unwrap();
        assert!(req.telegram_user_id.is_none());
    }

    #[test]
    fn non_numeric_progress_is_a_parse_error() {
        let res = serde_json::from_str::<progress::UpdateProgress>(
            r#"{"telegramUserId":"1001","progress":"ten"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn user_data_serializes_camel_case() {
        let body = serde_json::to_value(user::UserData {
            telegram_user_id: "1001".to_string(),
            username: None,
            balance: 3,
            progress: 0,
            referral_code: Some("AB12CD34".to_string()),
            referred_by: None,
            created: true,
        })
        .unwrap();
        assert_eq!(body["telegramUserId"], "1001");
        assert_eq!(body["referralCode"], "AB12CD34");
        assert_eq!(body["referredBy"], serde_json::Value::Null);
    }
}
