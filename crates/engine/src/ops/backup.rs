//! Whole-database backup and restore for the admin endpoints.

use std::path::{Path, PathBuf};

use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveValue, Database, DatabaseBackend, QueryOrder, Statement, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{Engine, EngineError, ResultEngine, users};

use super::with_tx;

/// Rows per INSERT while restoring, well below SQLite's bound variable limit.
const RESTORE_CHUNK: usize = 500;

impl Engine {
    /// Return a standalone SQLite copy of the database.
    pub async fn backup(&self) -> ResultEngine<Vec<u8>> {
        let backend = self.database.get_database_backend();
        if backend != DatabaseBackend::Sqlite {
            return Err(EngineError::InvalidInput(
                "backup requires a sqlite database".to_string(),
            ));
        }

        let path = scratch_path("backup");
        self.database
            .execute(Statement::from_sql_and_values(
                backend,
                "VACUUM INTO ?",
                vec![path.display().to_string().into()],
            ))
            .await?;

        let bytes = tokio::fs::read(&path).await;
        if let Err(err) = tokio::fs::remove_file(&path).await {
            tracing::warn!("failed to remove {}: {err}", path.display());
        }
        let bytes = bytes?;

        tracing::info!("database backup taken ({} bytes)", bytes.len());
        Ok(bytes)
    }

    /// Replace every user with the ones found in `bytes`, a database produced
    /// by [`Engine::backup`]. Returns the number of restored users.
    ///
    /// The backup is migrated and read in full before the live table is
    /// touched, and the replacement is a single transaction.
    pub async fn restore(&self, bytes: &[u8]) -> ResultEngine<u64> {
        if bytes.is_empty() {
            return Err(EngineError::InvalidInput("backup is empty".to_string()));
        }

        let path = scratch_path("restore");
        tokio::fs::write(&path, bytes).await?;
        let rows = read_backup(&path).await;
        if let Err(err) = tokio::fs::remove_file(&path).await {
            tracing::warn!("failed to remove {}: {err}", path.display());
        }
        let rows = rows?;
        let restored = rows.len() as u64;

        with_tx!(self, |db_tx| {
            users::Entity::delete_many().exec(&db_tx).await?;
            for chunk in rows.chunks(RESTORE_CHUNK) {
                users::Entity::insert_many(chunk.iter().map(restored_row))
                    .exec(&db_tx)
                    .await?;
            }
            Ok::<_, EngineError>(())
        })?;

        tracing::info!("database restored with {restored} users");
        Ok(restored)
    }
}

fn scratch_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tap_game_{label}_{}.db", Uuid::new_v4()))
}

async fn read_backup(path: &Path) -> ResultEngine<Vec<users::Model>> {
    let invalid = |err: DbErr| EngineError::InvalidInput(format!("invalid backup: {err}"));

    // The scratch copy is brought to the current schema, so data files
    // written before the later columns existed are accepted too.
    let url = format!("sqlite:{}?mode=rw", path.display());
    let db = Database::connect(url).await.map_err(invalid)?;
    let rows = match Migrator::up(&db, None).await {
        Ok(()) => users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&db)
            .await
            .map_err(invalid),
        Err(err) => Err(invalid(err)),
    };
    if let Err(err) = db.close().await {
        tracing::warn!("failed to close backup connection: {err}");
    }
    rows
}

fn restored_row(model: &users::Model) -> users::ActiveModel {
    users::ActiveModel {
        id: ActiveValue::Set(model.id),
        telegram_user_id: ActiveValue::Set(model.telegram_user_id.clone()),
        username: ActiveValue::Set(model.username.clone()),
        balance: ActiveValue::Set(model.balance),
        progress: ActiveValue::Set(model.progress),
        referral_code: ActiveValue::Set(model.referral_code.clone()),
        referred_by: ActiveValue::Set(model.referred_by.clone()),
    }
}
