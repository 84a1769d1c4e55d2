//! Game engine: the user store and the referral resolver.
//!
//! Every operation goes through [`Engine`], which owns the database
//! connection. Build it once at startup with [`Engine::builder`] after the
//! migrations ran, then share it.

use rand::Rng;
use sea_orm::DatabaseConnection;
use serde::Deserialize;

pub use error::EngineError;
pub use referral::{DEFAULT_REFERRAL_BONUS, Linkage};
pub use users::{Fetched, LeaderboardEntry, ReferralEntry, User};

mod error;
mod ops;
mod referral;
mod users;

type ResultEngine<T> = Result<T, EngineError>;

/// Balance granted to a user on first contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartingBalance {
    Fixed(i64),
    /// Uniformly drawn from `min..=max`.
    Random { min: i64, max: i64 },
}

impl Default for StartingBalance {
    fn default() -> Self {
        Self::Fixed(0)
    }
}

impl StartingBalance {
    fn validate(&self) -> ResultEngine<()> {
        if let Self::Random { min, max } = *self
            && min > max
        {
            return Err(EngineError::InvalidInput(format!(
                "starting balance range is empty: {min} > {max}"
            )));
        }
        Ok(())
    }

    fn draw(&self) -> i64 {
        match *self {
            Self::Fixed(amount) => amount,
            Self::Random { min, max } => rand::thread_rng().gen_range(min..=max),
        }
    }
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    starting_balance: StartingBalance,
    referral_bonus: i64,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn referral_bonus(&self) -> i64 {
        self.referral_bonus
    }

    pub fn starting_balance(&self) -> StartingBalance {
        self.starting_balance
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    starting_balance: StartingBalance,
    referral_bonus: i64,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            starting_balance: StartingBalance::default(),
            referral_bonus: DEFAULT_REFERRAL_BONUS,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    pub fn starting_balance(mut self, starting_balance: StartingBalance) -> EngineBuilder {
        self.starting_balance = starting_balance;
        self
    }

    /// Amount credited to a referrer for each new linked user.
    pub fn referral_bonus(mut self, bonus: i64) -> EngineBuilder {
        self.referral_bonus = bonus;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        self.starting_balance.validate()?;
        if self.referral_bonus < 0 {
            return Err(EngineError::InvalidInput(
                "referral bonus must be >= 0".to_string(),
            ));
        }

        Ok(Engine {
            database: self.database,
            starting_balance: self.starting_balance,
            referral_bonus: self.referral_bonus,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_starting_balance_is_constant() {
        let policy = StartingBalance::Fixed(250);
        assert_eq!(policy.draw(), 250);
        assert_eq!(policy.draw(), 250);
    }

    #[test]
    fn random_starting_balance_stays_in_range() {
        let policy = StartingBalance::Random { min: 100, max: 1000 };
        for _ in 0..200 {
            let amount = policy.draw();
            assert!((100..=1000).contains(&amount));
        }
    }

    #[test]
    fn empty_range_is_rejected() {
        let policy = StartingBalance::Random { min: 10, max: 1 };
        assert!(matches!(
            policy.validate(),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn starting_balance_deserializes_from_settings() {
        #[derive(Deserialize)]
        struct Game {
            starting_balance: StartingBalance,
        }

        let fixed: Game = serde_json::from_str(r#"{"starting_balance":{"fixed":0}}"#).unwrap();
        assert_eq!(fixed.starting_balance, StartingBalance::Fixed(0));

        let random: Game =
            serde_json::from_str(r#"{"starting_balance":{"random":{"min":100,"max":1000}}}"#)
                .unwrap();
        assert_eq!(
            random.starting_balance,
            StartingBalance::Random { min: 100, max: 1000 }
        );
    }
}
