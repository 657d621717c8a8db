//! Balance repository feeding the aggregate projections.

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use vola_core::balance::{self, BalanceTotals, DailyTotals, MovementAmounts};

use crate::entities::movements;
use crate::repositories::movement::{MovementRepoError, movement_amounts};

/// Balance repository for read-side aggregate queries.
#[derive(Debug, Clone)]
pub struct BalanceRepository {
    db: DatabaseConnection,
}

impl BalanceRepository {
    /// Creates a new balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes the overall cash position over every recorded movement.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row fails boundary
    /// validation.
    pub async fn cash_balance(&self) -> Result<BalanceTotals, MovementRepoError> {
        let rows = movements::Entity::find().all(&self.db).await?;
        let amounts = parse_rows(&rows)?;
        Ok(balance::cash_balance(&amounts))
    }

    /// Computes entry/exit totals over movements dated on or after `since`
    /// (boundary inclusive).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row fails boundary
    /// validation.
    pub async fn daily_totals(
        &self,
        since: DateTime<Utc>,
    ) -> Result<DailyTotals, MovementRepoError> {
        let rows = movements::Entity::find()
            .filter(movements::Column::Date.gte(since))
            .all(&self.db)
            .await?;
        let amounts = parse_rows(&rows)?;
        Ok(balance::daily_totals(&amounts))
    }
}

fn parse_rows(rows: &[movements::Model]) -> Result<Vec<MovementAmounts>, MovementRepoError> {
    rows.iter().map(movement_amounts).collect()
}
