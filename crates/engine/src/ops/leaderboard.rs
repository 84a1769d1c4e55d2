use sea_orm::{QueryOrder, QuerySelect, prelude::*};

use crate::{Engine, LeaderboardEntry, ResultEngine, users};

impl Engine {
    /// Return at most `limit` users ordered by balance, highest first.
    ///
    /// Equal balances are ordered by first contact, earliest first.
    pub async fn top_players(&self, limit: u64) -> ResultEngine<Vec<LeaderboardEntry>> {
        let models = users::Entity::find()
            .order_by_desc(users::Column::Balance)
            .order_by_asc(users::Column::Id)
            .limit(limit)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(LeaderboardEntry::from).collect())
    }
}
