//! Trosa repository for debt and payment database operations.
//!
//! Payment mutations are serialized per trosa: the row is locked with
//! `SELECT ... FOR UPDATE` inside a transaction before the payment set is
//! read, so the reconciler always sees a consistent snapshot and the
//! payment-sum invariant holds under concurrent writers. Rejections commit
//! nothing.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use vola_core::trosa::{
    DebtLedger, DebtState, DebtUpdate, PaymentRecord, TrosaAggregate, TrosaError, TrosaStatus,
};
use vola_shared::types::PageRequest;

use crate::entities::{trosa, trosa_payments};

/// Error types for trosa operations.
#[derive(Debug, thiserror::Error)]
pub enum TrosaRepoError {
    /// Trosa not found or not owned by the caller.
    #[error("Trosa not found: {0}")]
    NotFound(Uuid),

    /// A business rule rejected the mutation.
    #[error(transparent)]
    Domain(#[from] TrosaError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a trosa.
#[derive(Debug, Clone)]
pub struct CreateTrosaInput {
    /// Owning user.
    pub user_id: Uuid,
    /// The named debtor.
    pub debtor_name: String,
    /// Optional free-text note.
    pub description: Option<String>,
    /// Total amount owed.
    pub montant_total: Decimal,
}

/// Input for editing a trosa's details.
#[derive(Debug, Clone)]
pub struct UpdateTrosaInput {
    /// The named debtor.
    pub debtor_name: String,
    /// Optional free-text note.
    pub description: Option<String>,
    /// New total amount owed.
    pub montant_total: Decimal,
}

/// Filter options for listing trosa.
#[derive(Debug, Clone, Default)]
pub struct TrosaFilter {
    /// Case-insensitive debtor name search.
    pub q: Option<String>,
    /// Restrict to active or paid trosa.
    pub status: Option<TrosaStatus>,
}

/// Input for adding a payment against a trosa.
#[derive(Debug, Clone)]
pub struct NewPaymentInput {
    /// Amount paid.
    pub montant: Decimal,
    /// When the payment was made.
    pub date_paiement: DateTime<Utc>,
    /// Optional free-text note.
    pub description: Option<String>,
}

/// A trosa with its payments and freshly recomputed aggregate.
#[derive(Debug, Clone)]
pub struct TrosaWithPayments {
    /// The trosa row.
    pub trosa: trosa::Model,
    /// Its payments, newest first.
    pub payments: Vec<trosa_payments::Model>,
    /// Projection recomputed from the payment set, not the stored flag.
    pub aggregate: TrosaAggregate,
}

/// Trosa repository for CRUD and reconciliation operations.
#[derive(Debug, Clone)]
pub struct TrosaRepository {
    db: DatabaseConnection,
}

impl TrosaRepository {
    /// Creates a new trosa repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a trosa with no payments.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the total is not positive.
    pub async fn create(&self, input: CreateTrosaInput) -> Result<trosa::Model, TrosaRepoError> {
        DebtLedger::validate_total_change(&[], input.montant_total)?;

        let now = Utc::now().into();
        let row = trosa::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            debtor_name: Set(input.debtor_name),
            description: Set(input.description),
            montant_total: Set(input.montant_total),
            is_paid: Set(false),
            date_paiement: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(row.insert(&self.db).await?)
    }

    /// Lists trosa with their payments and recomputed aggregates, newest
    /// first, with the total row count for the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn list(
        &self,
        filter: &TrosaFilter,
        page: &PageRequest,
    ) -> Result<(Vec<TrosaWithPayments>, u64), TrosaRepoError> {
        let mut query = trosa::Entity::find();

        if let Some(q) = filter.q.as_deref().filter(|q| !q.is_empty()) {
            query = query.filter(
                Expr::col((trosa::Entity, trosa::Column::DebtorName)).ilike(format!("%{q}%")),
            );
        }

        if let Some(status) = filter.status {
            query = query.filter(trosa::Column::IsPaid.eq(status.is_paid()));
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(trosa::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let payments = trosa_payments::Entity::find()
                .filter(trosa_payments::Column::TrosaId.eq(row.id))
                .order_by_desc(trosa_payments::Column::DatePaiement)
                .all(&self.db)
                .await?;

            let records: Vec<PaymentRecord> = payments.iter().map(payment_record).collect();
            let aggregate = DebtLedger::recompute_aggregate(&debt_state(&row), &records);

            result.push(TrosaWithPayments {
                trosa: row,
                payments,
                aggregate,
            });
        }

        Ok((result, total))
    }

    /// Edits a trosa's details, revalidating the new total against the
    /// recorded payments and recomputing the paid status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the trosa does not exist or belongs to another
    /// user, or a domain error if the new total undercuts the payments.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        input: UpdateTrosaInput,
    ) -> Result<trosa::Model, TrosaRepoError> {
        let txn = self.db.begin().await?;

        let row = find_owned_locked(&txn, id, user_id).await?;
        let payments = payments_of(&txn, id).await?;
        let records: Vec<PaymentRecord> = payments.iter().map(payment_record).collect();

        let update =
            DebtLedger::apply_total_change(&debt_state(&row), &records, input.montant_total, Utc::now())?;

        let mut active: trosa::ActiveModel = row.into();
        active.debtor_name = Set(input.debtor_name);
        active.description = Set(input.description);
        active.montant_total = Set(input.montant_total);
        active.is_paid = Set(update.is_paid);
        active.date_paiement = Set(update.date_paiement.map(Into::into));
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes a trosa and all of its payments.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the trosa does not exist or belongs to another
    /// user.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), TrosaRepoError> {
        let txn = self.db.begin().await?;

        let row = find_owned_locked(&txn, id, user_id).await?;

        // The FK also cascades; deleting explicitly keeps the intent visible
        trosa_payments::Entity::delete_many()
            .filter(trosa_payments::Column::TrosaId.eq(row.id))
            .exec(&txn)
            .await?;
        trosa::Entity::delete_by_id(row.id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Lists a trosa's payments, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the trosa does not exist or belongs to another
    /// user.
    pub async fn payments(
        &self,
        trosa_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<trosa_payments::Model>, TrosaRepoError> {
        find_owned(&self.db, trosa_id, user_id).await?;

        Ok(trosa_payments::Entity::find()
            .filter(trosa_payments::Column::TrosaId.eq(trosa_id))
            .order_by_desc(trosa_payments::Column::DatePaiement)
            .all(&self.db)
            .await?)
    }

    /// Applies a payment against a trosa and persists the derived status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing/foreign trosa, or a domain error if
    /// the reconciler rejects the payment. Nothing is written on rejection.
    pub async fn add_payment(
        &self,
        trosa_id: Uuid,
        user_id: Uuid,
        input: NewPaymentInput,
    ) -> Result<(trosa_payments::Model, DebtUpdate), TrosaRepoError> {
        let txn = self.db.begin().await?;

        let row = find_owned_locked(&txn, trosa_id, user_id).await?;
        let existing = payments_of(&txn, trosa_id).await?;
        let records: Vec<PaymentRecord> = existing.iter().map(payment_record).collect();

        let payment = PaymentRecord {
            id: Uuid::new_v4(),
            montant: input.montant,
            date_paiement: input.date_paiement,
            description: input.description.clone(),
        };
        let payment_id = payment.id;

        let reconciled =
            DebtLedger::add_payment(&debt_state(&row), &records, payment, Utc::now())?;

        let now = Utc::now().into();
        let inserted = trosa_payments::ActiveModel {
            id: Set(payment_id),
            trosa_id: Set(trosa_id),
            montant: Set(input.montant),
            date_paiement: Set(input.date_paiement.into()),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        apply_debt_update(&txn, row, &reconciled.debt).await?;
        txn.commit().await?;

        Ok((inserted, reconciled.debt))
    }

    /// Removes a payment and recomputes the trosa's status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing/foreign trosa, or a domain error if
    /// the payment is not part of this trosa.
    pub async fn remove_payment(
        &self,
        trosa_id: Uuid,
        user_id: Uuid,
        payment_id: Uuid,
    ) -> Result<DebtUpdate, TrosaRepoError> {
        let txn = self.db.begin().await?;

        let row = find_owned_locked(&txn, trosa_id, user_id).await?;
        let existing = payments_of(&txn, trosa_id).await?;
        let records: Vec<PaymentRecord> = existing.iter().map(payment_record).collect();

        let reconciled = DebtLedger::remove_payment(&debt_state(&row), &records, payment_id)?;

        trosa_payments::Entity::delete_many()
            .filter(trosa_payments::Column::Id.eq(payment_id))
            .filter(trosa_payments::Column::TrosaId.eq(trosa_id))
            .exec(&txn)
            .await?;

        apply_debt_update(&txn, row, &reconciled.debt).await?;
        txn.commit().await?;

        Ok(reconciled.debt)
    }

    /// Returns up to 10 distinct debtor names for autocomplete, most recent
    /// first, optionally filtered by a case-insensitive fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn debtors(
        &self,
        user_id: Uuid,
        q: Option<&str>,
    ) -> Result<Vec<String>, TrosaRepoError> {
        let mut query = trosa::Entity::find()
            .select_only()
            .column(trosa::Column::DebtorName)
            .filter(trosa::Column::UserId.eq(user_id));

        if let Some(q) = q.filter(|q| !q.is_empty()) {
            query = query.filter(
                Expr::col((trosa::Entity, trosa::Column::DebtorName)).ilike(format!("%{q}%")),
            );
        }

        let names: Vec<String> = query
            .order_by_desc(trosa::Column::CreatedAt)
            .limit(100)
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut distinct = Vec::new();
        for name in names {
            if !distinct.contains(&name) {
                distinct.push(name);
            }
            if distinct.len() == 10 {
                break;
            }
        }

        Ok(distinct)
    }
}

/// Maps a trosa row to the reconciler's debt snapshot.
fn debt_state(model: &trosa::Model) -> DebtState {
    DebtState {
        montant_total: model.montant_total,
        is_paid: model.is_paid,
        date_paiement: model.date_paiement.map(|d| d.with_timezone(&Utc)),
    }
}

/// Maps a payment row to the reconciler's payment record.
fn payment_record(model: &trosa_payments::Model) -> PaymentRecord {
    PaymentRecord {
        id: model.id,
        montant: model.montant,
        date_paiement: model.date_paiement.with_timezone(&Utc),
        description: model.description.clone(),
    }
}

/// Fetches a trosa scoped to its owner.
async fn find_owned<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    user_id: Uuid,
) -> Result<trosa::Model, TrosaRepoError> {
    trosa::Entity::find_by_id(id)
        .filter(trosa::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or(TrosaRepoError::NotFound(id))
}

/// Fetches a trosa scoped to its owner, locking the row for the duration of
/// the transaction.
async fn find_owned_locked(
    txn: &DatabaseTransaction,
    id: Uuid,
    user_id: Uuid,
) -> Result<trosa::Model, TrosaRepoError> {
    trosa::Entity::find_by_id(id)
        .filter(trosa::Column::UserId.eq(user_id))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(TrosaRepoError::NotFound(id))
}

/// Fetches a trosa's payments inside the current transaction.
async fn payments_of(
    txn: &DatabaseTransaction,
    trosa_id: Uuid,
) -> Result<Vec<trosa_payments::Model>, TrosaRepoError> {
    Ok(trosa_payments::Entity::find()
        .filter(trosa_payments::Column::TrosaId.eq(trosa_id))
        .order_by_asc(trosa_payments::Column::CreatedAt)
        .all(txn)
        .await?)
}

/// Persists the derived trosa fields after a payment mutation.
async fn apply_debt_update(
    txn: &DatabaseTransaction,
    row: trosa::Model,
    update: &DebtUpdate,
) -> Result<(), TrosaRepoError> {
    let mut active: trosa::ActiveModel = row.into();
    active.is_paid = Set(update.is_paid);
    active.date_paiement = Set(update.date_paiement.map(Into::into));
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_trosa_model(total: Decimal, is_paid: bool) -> trosa::Model {
        let now = Utc::now().into();
        trosa::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            debtor_name: "Rasoa".to_string(),
            description: None,
            montant_total: total,
            is_paid,
            date_paiement: if is_paid { Some(now) } else { None },
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_debt_state_mapping() {
        let model = make_trosa_model(dec!(1000), true);
        let state = debt_state(&model);

        assert_eq!(state.montant_total, dec!(1000));
        assert!(state.is_paid);
        assert!(state.date_paiement.is_some());
    }

    #[test]
    fn test_payment_record_mapping() {
        let now = Utc::now();
        let model = trosa_payments::Model {
            id: Uuid::new_v4(),
            trosa_id: Uuid::new_v4(),
            montant: dec!(250),
            date_paiement: now.into(),
            description: Some("first installment".to_string()),
            created_at: now.into(),
            updated_at: now.into(),
        };

        let record = payment_record(&model);
        assert_eq!(record.id, model.id);
        assert_eq!(record.montant, dec!(250));
        assert_eq!(record.description.as_deref(), Some("first installment"));
    }
}
