//! Movement repository for cash movement database operations.

use std::str::FromStr;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use vola_core::balance::MovementAmounts;
use vola_core::movement::{MovementType, ResolvedMovement};
use vola_shared::types::{Currency, PageRequest};

use crate::entities::movements;

/// Error types for movement operations.
#[derive(Debug, thiserror::Error)]
pub enum MovementRepoError {
    /// Movement not found or not owned by the caller.
    #[error("Movement not found: {0}")]
    NotFound(Uuid),

    /// A stored row failed boundary validation on read.
    #[error("Stored movement {id} has an invalid {field} value")]
    Corrupted {
        /// The offending row.
        id: Uuid,
        /// The column that failed to parse.
        field: &'static str,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Movement repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
}

impl MovementRepository {
    /// Creates a new movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a resolved movement for the given user.
    ///
    /// The caller resolves the movement through `MovementService` first, so
    /// `amount_mga` is always the recomputed value.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        movement: &ResolvedMovement,
    ) -> Result<movements::Model, MovementRepoError> {
        let now = Utc::now().into();

        let row = movements::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            movement_type: Set(movement.movement_type.to_string()),
            currency: Set(movement.currency.to_string()),
            amount: Set(movement.amount),
            exchange_rate: Set(movement.exchange_rate),
            amount_mga: Set(movement.amount_mga),
            description: Set(movement.description.clone()),
            date: Set(movement.date.into()),
            author: Set(movement.author.clone()),
            responsible: Set(movement.responsible.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(row.insert(&self.db).await?)
    }

    /// Lists movements, newest first, with the total row count.
    ///
    /// Movements are listed across all users; ownership only restricts
    /// mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<movements::Model>, u64), MovementRepoError> {
        let total = movements::Entity::find().count(&self.db).await?;

        let rows = movements::Entity::find()
            .order_by_desc(movements::Column::Date)
            .order_by_desc(movements::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Updates a movement in place, re-persisting the freshly resolved
    /// amounts.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the movement does not exist or belongs to
    /// another user.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        movement: &ResolvedMovement,
    ) -> Result<movements::Model, MovementRepoError> {
        let existing = movements::Entity::find_by_id(id)
            .filter(movements::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(MovementRepoError::NotFound(id))?;

        let mut row: movements::ActiveModel = existing.into();
        row.movement_type = Set(movement.movement_type.to_string());
        row.currency = Set(movement.currency.to_string());
        row.amount = Set(movement.amount);
        row.exchange_rate = Set(movement.exchange_rate);
        row.amount_mga = Set(movement.amount_mga);
        row.description = Set(movement.description.clone());
        row.date = Set(movement.date.into());
        row.responsible = Set(movement.responsible.clone());
        row.updated_at = Set(Utc::now().into());

        Ok(row.update(&self.db).await?)
    }

    /// Deletes a movement owned by the given user.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the movement does not exist or belongs to
    /// another user.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), MovementRepoError> {
        let result = movements::Entity::delete_many()
            .filter(movements::Column::Id.eq(id))
            .filter(movements::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(MovementRepoError::NotFound(id));
        }
        Ok(())
    }
}

/// Parses a stored movement row into the slice the balance projections
/// consume, re-validating the enumerated columns on the way out.
///
/// # Errors
///
/// Returns `Corrupted` if a stored enum column no longer parses.
pub fn movement_amounts(model: &movements::Model) -> Result<MovementAmounts, MovementRepoError> {
    let movement_type =
        MovementType::from_str(&model.movement_type).map_err(|_| MovementRepoError::Corrupted {
            id: model.id,
            field: "movement_type",
        })?;
    let currency = Currency::from_str(&model.currency).map_err(|_| MovementRepoError::Corrupted {
        id: model.id,
        field: "currency",
    })?;

    Ok(MovementAmounts {
        movement_type,
        currency,
        amount: model.amount,
        amount_mga: model.amount_mga,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_model(movement_type: &str, currency: &str) -> movements::Model {
        let now = Utc::now().into();
        movements::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            movement_type: movement_type.to_string(),
            currency: currency.to_string(),
            amount: dec!(100),
            exchange_rate: dec!(4400),
            amount_mga: dec!(440000),
            description: "Stock purchase".to_string(),
            date: now,
            author: "Rakoto".to_string(),
            responsible: "Hery".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_movement_amounts_parses_stored_row() {
        let model = make_model("entry", "USD");
        let amounts = movement_amounts(&model).unwrap();

        assert_eq!(amounts.currency, Currency::Usd);
        assert_eq!(amounts.amount_mga, dec!(440000));
    }

    #[test]
    fn test_movement_amounts_rejects_corrupt_type() {
        let model = make_model("transfer", "USD");
        assert!(matches!(
            movement_amounts(&model),
            Err(MovementRepoError::Corrupted {
                field: "movement_type",
                ..
            })
        ));
    }

    #[test]
    fn test_movement_amounts_rejects_corrupt_currency() {
        let model = make_model("entry", "XXX");
        assert!(matches!(
            movement_amounts(&model),
            Err(MovementRepoError::Corrupted {
                field: "currency",
                ..
            })
        ));
    }
}
