use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};

use crate::{EngineError, ResultEngine};

mod backup;
mod leaderboard;
mod referrals;
mod users;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

fn normalize_telegram_user_id(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(
            "telegram user id must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// `balance + delta` clamped to the `i64` range.
///
/// SQLite turns an overflowing integer sum into a REAL, which the column can
/// no longer be read back as, so the bound is applied before adding.
fn saturating_balance_add(delta: i64) -> SimpleExpr {
    let balance = Expr::col(crate::users::Column::Balance);
    let bounded = if delta >= 0 {
        Func::cust(Alias::new("MIN"))
            .arg(balance)
            .arg(Expr::val(i64::MAX - delta))
    } else {
        Func::cust(Alias::new("MAX"))
            .arg(balance)
            .arg(Expr::val(i64::MIN - delta))
    };
    Expr::expr(bounded).add(delta)
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_telegram_user_id_is_rejected() {
        assert!(matches!(
            normalize_telegram_user_id("   "),
            Err(EngineError::InvalidInput(_))
        ));
        assert_eq!(normalize_telegram_user_id(" 42 ").unwrap(), "42");
    }

    #[test]
    fn blank_optional_text_is_absent() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(
            normalize_optional_text(Some(" bob ")),
            Some("bob".to_string())
        );
    }
}
