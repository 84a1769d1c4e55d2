use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QuerySelect, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{
    Engine, EngineError, Fetched, Linkage, ResultEngine, User, referral::normalize_code, users,
};

use super::{
    normalize_optional_text, normalize_telegram_user_id, saturating_balance_add, with_tx,
};

impl Engine {
    /// Return the user with `telegram_user_id`, creating it on first contact.
    ///
    /// On an existing user:
    /// - a different non-empty `username` overwrites the stored one;
    /// - a missing referral code is generated (rows from before referrals);
    /// - `referral_code` links the user to its owner when the user has no
    ///   referrer yet.
    ///
    /// On a new user the row is inserted with the configured starting balance
    /// and a fresh referral code, then `referral_code` is resolved before the
    /// transaction commits.
    ///
    /// A concurrent first contact for the same id makes the loser fail with
    /// [`EngineError::ExistingKey`].
    pub async fn get_or_create(
        &self,
        telegram_user_id: &str,
        username: Option<&str>,
        referral_code: Option<&str>,
    ) -> ResultEngine<Fetched> {
        let telegram_user_id = normalize_telegram_user_id(telegram_user_id)?;
        let username = normalize_optional_text(username);
        let referral_code = normalize_optional_text(referral_code).map(|c| normalize_code(&c));

        with_tx!(self, |db_tx| {
            let existing = users::Entity::find()
                .filter(users::Column::TelegramUserId.eq(telegram_user_id.as_str()))
                .one(&db_tx)
                .await?;

            match existing {
                Some(model) => self
                    .refresh_user(&db_tx, model, username, referral_code.as_deref())
                    .await
                    .map(Fetched::Existing),
                None => self
                    .create_user(&db_tx, &telegram_user_id, username, referral_code.as_deref())
                    .await
                    .map(Fetched::Created),
            }
        })
    }

    /// Overwrite the balance of a user.
    ///
    /// Returns `false` when no user has `telegram_user_id`.
    pub async fn update_balance(&self, telegram_user_id: &str, balance: i64) -> ResultEngine<bool> {
        let telegram_user_id = normalize_telegram_user_id(telegram_user_id)?;
        let result = users::Entity::update_many()
            .col_expr(users::Column::Balance, Expr::value(balance))
            .filter(users::Column::TelegramUserId.eq(telegram_user_id))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Add `delta` to the balance of a user in a single statement and return
    /// the new balance, or `None` when no user has `telegram_user_id`.
    ///
    /// The balance saturates at the bounds of `i64`.
    pub async fn increment_balance(
        &self,
        telegram_user_id: &str,
        delta: i64,
    ) -> ResultEngine<Option<i64>> {
        let telegram_user_id = normalize_telegram_user_id(telegram_user_id)?;
        with_tx!(self, |db_tx| {
            let result = users::Entity::update_many()
                .col_expr(users::Column::Balance, saturating_balance_add(delta))
                .filter(users::Column::TelegramUserId.eq(telegram_user_id.as_str()))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                Ok(None)
            } else {
                let balance: Option<i64> = users::Entity::find()
                    .select_only()
                    .column(users::Column::Balance)
                    .filter(users::Column::TelegramUserId.eq(telegram_user_id.as_str()))
                    .into_tuple()
                    .one(&db_tx)
                    .await?;
                Ok::<_, EngineError>(balance)
            }
        })
    }

    /// Overwrite the progress of a user.
    ///
    /// Returns `false` when no user has `telegram_user_id`.
    pub async fn update_progress(
        &self,
        telegram_user_id: &str,
        progress: i64,
    ) -> ResultEngine<bool> {
        let telegram_user_id = normalize_telegram_user_id(telegram_user_id)?;
        let result = users::Entity::update_many()
            .col_expr(users::Column::Progress, Expr::value(progress))
            .filter(users::Column::TelegramUserId.eq(telegram_user_id))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn refresh_user(
        &self,
        db_tx: &DatabaseTransaction,
        model: users::Model,
        username: Option<String>,
        referral_code: Option<&str>,
    ) -> ResultEngine<User> {
        let mut active: users::ActiveModel = model.clone().into();
        let mut changed = false;

        if let Some(username) = username
            && model.username.as_deref() != Some(username.as_str())
        {
            active.username = ActiveValue::Set(Some(username));
            changed = true;
        }
        if model.referral_code.is_none() {
            let code = self.unused_referral_code(db_tx).await?;
            tracing::debug!("backfilled referral code for {}", model.telegram_user_id);
            active.referral_code = ActiveValue::Set(Some(code));
            changed = true;
        }

        let mut model = if changed {
            active.update(db_tx).await?
        } else {
            model
        };

        if let Some(code) = referral_code
            && model.referred_by.is_none()
        {
            let linkage = self.resolve_referral(db_tx, &model, code).await?;
            if matches!(linkage, Linkage::Linked { .. }) {
                model = reload_user(db_tx, model.id).await?;
            }
        }

        Ok(model.into())
    }

    async fn create_user(
        &self,
        db_tx: &DatabaseTransaction,
        telegram_user_id: &str,
        username: Option<String>,
        referral_code: Option<&str>,
    ) -> ResultEngine<User> {
        let own_code = self.unused_referral_code(db_tx).await?;
        let active = users::ActiveModel {
            telegram_user_id: ActiveValue::Set(telegram_user_id.to_string()),
            username: ActiveValue::Set(username),
            balance: ActiveValue::Set(self.starting_balance.draw()),
            progress: ActiveValue::Set(0),
            referral_code: ActiveValue::Set(Some(own_code)),
            referred_by: ActiveValue::Set(None),
            ..Default::default()
        };
        let mut model = active
            .insert(db_tx)
            .await
            .map_err(|err| EngineError::from_insert(err, telegram_user_id))?;
        tracing::info!("created user {telegram_user_id}");

        if let Some(code) = referral_code {
            let linkage = self.resolve_referral(db_tx, &model, code).await?;
            if matches!(linkage, Linkage::Linked { .. }) {
                model = reload_user(db_tx, model.id).await?;
            }
        }

        Ok(model.into())
    }
}

async fn reload_user(db_tx: &DatabaseTransaction, id: i32) -> ResultEngine<users::Model> {
    users::Entity::find_by_id(id)
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
}

#[cfg(test)]
mod tests {
    use migration::MigratorTrait;
    use sea_orm::Database;

    use super::*;

    async fn engine() -> Engine {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        Engine::builder().database(db).build().await.unwrap()
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_retryable_conflict() {
        let engine = engine().await;
        engine.get_or_create("1001", None, None).await.unwrap();

        let db_tx = engine.database.begin().await.unwrap();
        let err = engine
            .create_user(&db_tx, "1001", None, None)
            .await
            .unwrap_err();
        db_tx.rollback().await.unwrap();

        assert_eq!(err, EngineError::ExistingKey("1001".to_string()));
        assert!(err.is_retryable());
    }
}
