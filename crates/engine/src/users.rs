//! The module contains the `User` struct, the only entity of the game.
//!
//! A user is identified by the Telegram id supplied by the client. The
//! internal `id` never leaves the engine, it only orders rows by first
//! contact.

use sea_orm::entity::prelude::*;

/// A player as seen by callers of the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub telegram_user_id: String,
    pub username: Option<String>,
    pub balance: i64,
    pub progress: i64,
    pub referral_code: Option<String>,
    /// `telegram_user_id` of the referrer. Written at most once.
    pub referred_by: Option<String>,
}

impl From<Model> for User {
    fn from(value: Model) -> Self {
        Self {
            telegram_user_id: value.telegram_user_id,
            username: value.username,
            balance: value.balance,
            progress: value.progress,
            referral_code: value.referral_code,
            referred_by: value.referred_by,
        }
    }
}

/// Outcome of [`Engine::get_or_create`](crate::Engine::get_or_create).
///
/// Callers can tell a first contact apart from a steady-state read without
/// checking for the row themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fetched {
    Existing(User),
    Created(User),
}

impl Fetched {
    pub fn user(&self) -> &User {
        match self {
            Self::Existing(user) | Self::Created(user) => user,
        }
    }

    pub fn into_user(self) -> User {
        match self {
            Self::Existing(user) | Self::Created(user) => user,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// One row of the leaderboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub telegram_user_id: String,
    pub username: Option<String>,
    pub balance: i64,
}

/// A user brought in by a referrer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferralEntry {
    pub telegram_user_id: String,
    pub username: Option<String>,
    pub balance: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub telegram_user_id: String,
    pub username: Option<String>,
    pub balance: i64,
    pub progress: i64,
    #[sea_orm(unique)]
    pub referral_code: Option<String>,
    pub referred_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LeaderboardEntry {
    fn from(value: Model) -> Self {
        Self {
            telegram_user_id: value.telegram_user_id,
            username: value.username,
            balance: value.balance,
        }
    }
}

impl From<Model> for ReferralEntry {
    fn from(value: Model) -> Self {
        Self {
            telegram_user_id: value.telegram_user_id,
            username: value.username,
            balance: value.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Model {
        Model {
            id: 7,
            telegram_user_id: "1001".to_string(),
            username: Some("alice".to_string()),
            balance: 25,
            progress: 3,
            referral_code: Some("AB12CD34".to_string()),
            referred_by: None,
        }
    }

    #[test]
    fn user_drops_internal_id() {
        let user = User::from(model());
        assert_eq!(user.telegram_user_id, "1001");
        assert_eq!(user.balance, 25);
        assert_eq!(user.progress, 3);
        assert_eq!(user.referral_code.as_deref(), Some("AB12CD34"));
    }

    #[test]
    fn fetched_exposes_user_either_way() {
        let created = Fetched::Created(User::from(model()));
        let existing = Fetched::Existing(User::from(model()));

        assert!(created.is_created());
        assert!(!existing.is_created());
        assert_eq!(created.user(), existing.user());
        assert_eq!(existing.into_user().username.as_deref(), Some("alice"));
    }
}
