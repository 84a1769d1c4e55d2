use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, prelude::*, sea_query::Expr};

use crate::{
    Engine, EngineError, Linkage, ReferralEntry, ResultEngine,
    referral::{CODE_ATTEMPTS, generate_code},
    users,
};

use super::{normalize_telegram_user_id, saturating_balance_add};

impl Engine {
    /// Return the users linked to `referrer`, in signup order.
    ///
    /// An unknown referrer simply has no referrals.
    pub async fn referrals(&self, referrer: &str) -> ResultEngine<Vec<ReferralEntry>> {
        let referrer = normalize_telegram_user_id(referrer)?;
        let models = users::Entity::find()
            .filter(users::Column::ReferredBy.eq(referrer))
            .order_by_asc(users::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(ReferralEntry::from).collect())
    }

    /// Link `user` to the owner of `code` and credit the owner's bonus.
    ///
    /// Both writes happen on `db_tx`, so they commit or roll back together.
    /// The link is written only while `referred_by` is still NULL, which is
    /// what keeps the bonus from being paid twice.
    pub(crate) async fn resolve_referral(
        &self,
        db_tx: &DatabaseTransaction,
        user: &users::Model,
        code: &str,
    ) -> ResultEngine<Linkage> {
        if user.referral_code.as_deref() == Some(code) {
            tracing::debug!("{} tried to use its own referral code", user.telegram_user_id);
            return Ok(Linkage::SelfReferral);
        }

        let Some(referrer) = users::Entity::find()
            .filter(users::Column::ReferralCode.eq(code))
            .one(db_tx)
            .await?
        else {
            tracing::debug!("unknown referral code from {}", user.telegram_user_id);
            return Ok(Linkage::UnknownCode);
        };
        if referrer.telegram_user_id == user.telegram_user_id {
            return Ok(Linkage::SelfReferral);
        }

        let linked = users::Entity::update_many()
            .col_expr(
                users::Column::ReferredBy,
                Expr::value(referrer.telegram_user_id.clone()),
            )
            .filter(users::Column::Id.eq(user.id))
            .filter(users::Column::ReferredBy.is_null())
            .exec(db_tx)
            .await?;
        if linked.rows_affected == 0 {
            return Ok(Linkage::AlreadyLinked);
        }

        users::Entity::update_many()
            .col_expr(
                users::Column::Balance,
                saturating_balance_add(self.referral_bonus),
            )
            .filter(users::Column::Id.eq(referrer.id))
            .exec(db_tx)
            .await?;

        tracing::info!(
            "{} joined through {}, credited {}",
            user.telegram_user_id,
            referrer.telegram_user_id,
            self.referral_bonus
        );
        Ok(Linkage::Linked {
            referrer: referrer.telegram_user_id,
        })
    }

    /// Pick a referral code no user holds yet.
    pub(crate) async fn unused_referral_code(
        &self,
        db_tx: &DatabaseTransaction,
    ) -> ResultEngine<String> {
        for _ in 0..CODE_ATTEMPTS {
            let code = generate_code();
            let taken = users::Entity::find()
                .filter(users::Column::ReferralCode.eq(code.as_str()))
                .one(db_tx)
                .await?
                .is_some();
            if !taken {
                return Ok(code);
            }
        }
        Err(EngineError::ExistingKey("referral code".to_string()))
    }
}
