//! Debt ledger reconciliation service.
//!
//! Pure functions over a consistent snapshot of a trosa and its payments.
//! The caller (the repository layer) is responsible for holding that snapshot
//! stable across the check-then-write window and for persisting the returned
//! state atomically.
//!
//! State machine per trosa:
//! - `ACTIVE` (total paid < total owed) -> `PAID` when a payment addition
//!   reaches the total; stamps `date_paiement`.
//! - `PAID` -> `ACTIVE` when a payment removal drops the sum below the
//!   total; clears `date_paiement`.
//! - Payments against a `PAID` trosa are rejected.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::TrosaError;
use super::types::{DebtState, DebtUpdate, PaymentRecord, Reconciled, TrosaAggregate};

/// Debt ledger reconciliation over a trosa's payment set.
pub struct DebtLedger;

impl DebtLedger {
    /// Sums a payment set.
    #[must_use]
    pub fn total_paid(payments: &[PaymentRecord]) -> Decimal {
        payments.iter().map(|p| p.montant).sum()
    }

    /// Recomputes the paid/remaining projection for a trosa.
    ///
    /// Idempotent and side-effect free; run on every list/detail view
    /// instead of trusting the stored flag.
    #[must_use]
    pub fn recompute_aggregate(debt: &DebtState, payments: &[PaymentRecord]) -> TrosaAggregate {
        let total_paid = Self::total_paid(payments);
        TrosaAggregate {
            total_paid,
            remaining_amount: (debt.montant_total - total_paid).max(Decimal::ZERO),
            is_paid: total_paid >= debt.montant_total,
        }
    }

    /// Applies a new payment against a trosa.
    ///
    /// # Errors
    ///
    /// - `NonPositiveAmount` if the payment amount is not positive.
    /// - `AlreadyPaid` if the trosa is already fully paid.
    /// - `ExceedsRemaining` if the payment would push the paid sum past the
    ///   total owed; carries the exact remaining amount.
    pub fn add_payment(
        debt: &DebtState,
        existing_payments: &[PaymentRecord],
        new_payment: PaymentRecord,
        now: DateTime<Utc>,
    ) -> Result<Reconciled, TrosaError> {
        if new_payment.montant <= Decimal::ZERO {
            return Err(TrosaError::NonPositiveAmount);
        }

        if debt.is_paid {
            return Err(TrosaError::AlreadyPaid);
        }

        let total_paid = Self::total_paid(existing_payments);
        let new_total = total_paid + new_payment.montant;

        if new_total > debt.montant_total {
            return Err(TrosaError::ExceedsRemaining {
                attempted: new_payment.montant,
                remaining: debt.montant_total - total_paid,
            });
        }

        let mut payments = existing_payments.to_vec();
        payments.push(new_payment);

        let is_paid = new_total >= debt.montant_total;
        let date_paiement = if is_paid { Some(now) } else { None };

        Ok(Reconciled {
            payments,
            debt: DebtUpdate {
                is_paid,
                date_paiement,
                total_paid: new_total,
                remaining_amount: debt.montant_total - new_total,
            },
        })
    }

    /// Removes a payment from a trosa and recomputes its status.
    ///
    /// A paid trosa whose sum drops below the total revives to active and
    /// loses its settlement timestamp. If the sum somehow still covers the
    /// total (only possible when the total was edited independently), the
    /// trosa stays paid.
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound` if the payment is not in the set.
    pub fn remove_payment(
        debt: &DebtState,
        existing_payments: &[PaymentRecord],
        payment_id: Uuid,
    ) -> Result<Reconciled, TrosaError> {
        let index = existing_payments
            .iter()
            .position(|p| p.id == payment_id)
            .ok_or(TrosaError::PaymentNotFound(payment_id))?;

        let mut payments = existing_payments.to_vec();
        payments.remove(index);

        let total_paid = Self::total_paid(&payments);
        let still_paid = total_paid >= debt.montant_total;

        let (is_paid, date_paiement) = if still_paid {
            (debt.is_paid, debt.date_paiement)
        } else {
            (false, None)
        };

        Ok(Reconciled {
            payments,
            debt: DebtUpdate {
                is_paid,
                date_paiement,
                total_paid,
                remaining_amount: (debt.montant_total - total_paid).max(Decimal::ZERO),
            },
        })
    }

    /// Validates a proposed new total against the recorded payments.
    ///
    /// Lowering the total below the paid sum would silently break the
    /// payment-sum invariant, so it is rejected outright.
    ///
    /// # Errors
    ///
    /// - `NonPositiveTotal` if the new total is not positive.
    /// - `TotalBelowPaid` if recorded payments already exceed the new total.
    pub fn validate_total_change(
        payments: &[PaymentRecord],
        new_total: Decimal,
    ) -> Result<(), TrosaError> {
        if new_total <= Decimal::ZERO {
            return Err(TrosaError::NonPositiveTotal);
        }

        let total_paid = Self::total_paid(payments);
        if total_paid > new_total {
            return Err(TrosaError::TotalBelowPaid {
                total_paid,
                new_total,
            });
        }

        Ok(())
    }

    /// Applies a validated total change and recomputes the paid status.
    ///
    /// Raising the total past the paid sum revives a paid trosa to active;
    /// a total equal to the paid sum marks it paid, stamping `now` unless a
    /// settlement timestamp already exists.
    ///
    /// # Errors
    ///
    /// Same as [`Self::validate_total_change`].
    pub fn apply_total_change(
        debt: &DebtState,
        payments: &[PaymentRecord],
        new_total: Decimal,
        now: DateTime<Utc>,
    ) -> Result<DebtUpdate, TrosaError> {
        Self::validate_total_change(payments, new_total)?;

        let total_paid = Self::total_paid(payments);
        let is_paid = total_paid >= new_total;
        let date_paiement = if is_paid {
            debt.date_paiement.or(Some(now))
        } else {
            None
        };

        Ok(DebtUpdate {
            is_paid,
            date_paiement,
            total_paid,
            remaining_amount: new_total - total_paid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn make_debt(total: Decimal) -> DebtState {
        DebtState {
            montant_total: total,
            is_paid: false,
            date_paiement: None,
        }
    }

    fn make_payment(montant: Decimal) -> PaymentRecord {
        PaymentRecord {
            id: Uuid::new_v4(),
            montant,
            date_paiement: Utc::now(),
            description: None,
        }
    }

    #[test]
    fn test_partial_then_full_payment() {
        // Trosa of 1000: pay 600, then 400
        let now = Utc::now();
        let debt = make_debt(dec!(1000));

        let first = DebtLedger::add_payment(&debt, &[], make_payment(dec!(600)), now).unwrap();
        assert_eq!(first.debt.total_paid, dec!(600));
        assert_eq!(first.debt.remaining_amount, dec!(400));
        assert!(!first.debt.is_paid);
        assert!(first.debt.date_paiement.is_none());

        let second =
            DebtLedger::add_payment(&debt, &first.payments, make_payment(dec!(400)), now).unwrap();
        assert_eq!(second.debt.total_paid, dec!(1000));
        assert_eq!(second.debt.remaining_amount, dec!(0));
        assert!(second.debt.is_paid);
        assert_eq!(second.debt.date_paiement, Some(now));
    }

    #[test]
    fn test_paid_trosa_rejects_further_payments() {
        let now = Utc::now();
        let debt = DebtState {
            montant_total: dec!(1000),
            is_paid: true,
            date_paiement: Some(now),
        };
        let payments = vec![make_payment(dec!(1000))];

        let result = DebtLedger::add_payment(&debt, &payments, make_payment(dec!(1)), now);
        assert!(matches!(result, Err(TrosaError::AlreadyPaid)));
    }

    #[test]
    fn test_removal_revives_paid_trosa() {
        let now = Utc::now();
        let debt = make_debt(dec!(1000));

        let first = DebtLedger::add_payment(&debt, &[], make_payment(dec!(600)), now).unwrap();
        let second =
            DebtLedger::add_payment(&debt, &first.payments, make_payment(dec!(400)), now).unwrap();

        let paid_debt = DebtState {
            montant_total: dec!(1000),
            is_paid: second.debt.is_paid,
            date_paiement: second.debt.date_paiement,
        };
        let last_id = second.payments[1].id;

        let removed =
            DebtLedger::remove_payment(&paid_debt, &second.payments, last_id).unwrap();
        assert_eq!(removed.debt.total_paid, dec!(600));
        assert!(!removed.debt.is_paid);
        assert!(removed.debt.date_paiement.is_none());
        assert_eq!(removed.payments.len(), 1);
    }

    #[test]
    fn test_overshoot_rejected_with_remaining_figure() {
        let now = Utc::now();
        let debt = make_debt(dec!(500));

        let result = DebtLedger::add_payment(&debt, &[], make_payment(dec!(600)), now);
        match result {
            Err(TrosaError::ExceedsRemaining {
                attempted,
                remaining,
            }) => {
                assert_eq!(attempted, dec!(600));
                assert_eq!(remaining, dec!(500));
            }
            other => panic!("expected ExceedsRemaining, got {other:?}"),
        }
    }

    #[test]
    fn test_overshoot_after_partial_payment() {
        let now = Utc::now();
        let debt = make_debt(dec!(1000));
        let first = DebtLedger::add_payment(&debt, &[], make_payment(dec!(600)), now).unwrap();

        let result =
            DebtLedger::add_payment(&debt, &first.payments, make_payment(dec!(401)), now);
        match result {
            Err(TrosaError::ExceedsRemaining { remaining, .. }) => {
                assert_eq!(remaining, dec!(400));
            }
            other => panic!("expected ExceedsRemaining, got {other:?}"),
        }
    }

    #[test]
    fn test_exact_remaining_payment_accepted() {
        let now = Utc::now();
        let debt = make_debt(dec!(500));

        let result = DebtLedger::add_payment(&debt, &[], make_payment(dec!(500)), now).unwrap();
        assert!(result.debt.is_paid);
        assert_eq!(result.debt.remaining_amount, dec!(0));
    }

    #[test]
    fn test_zero_remaining_rejects_any_payment() {
        let now = Utc::now();
        let debt = make_debt(Decimal::ZERO);

        let result = DebtLedger::add_payment(&debt, &[], make_payment(dec!(0.01)), now);
        match result {
            Err(TrosaError::ExceedsRemaining { remaining, .. }) => {
                assert_eq!(remaining, dec!(0));
            }
            other => panic!("expected ExceedsRemaining, got {other:?}"),
        }
    }

    #[test]
    fn test_non_positive_payment_rejected() {
        let now = Utc::now();
        let debt = make_debt(dec!(1000));

        assert!(matches!(
            DebtLedger::add_payment(&debt, &[], make_payment(Decimal::ZERO), now),
            Err(TrosaError::NonPositiveAmount)
        ));
        assert!(matches!(
            DebtLedger::add_payment(&debt, &[], make_payment(dec!(-10)), now),
            Err(TrosaError::NonPositiveAmount)
        ));
    }

    #[test]
    fn test_remove_unknown_payment() {
        let debt = make_debt(dec!(1000));
        let payments = vec![make_payment(dec!(100))];
        let missing = Uuid::new_v4();

        assert!(matches!(
            DebtLedger::remove_payment(&debt, &payments, missing),
            Err(TrosaError::PaymentNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn test_removal_keeps_paid_when_sum_still_covers_total() {
        // Total lowered independently: two payments of 600 against a total
        // of 500. Removing one leaves 600 >= 500, so status is untouched.
        let now = Utc::now();
        let debt = DebtState {
            montant_total: dec!(500),
            is_paid: true,
            date_paiement: Some(now),
        };
        let payments = vec![make_payment(dec!(600)), make_payment(dec!(600))];

        let removed =
            DebtLedger::remove_payment(&debt, &payments, payments[0].id).unwrap();
        assert!(removed.debt.is_paid);
        assert_eq!(removed.debt.date_paiement, Some(now));
        assert_eq!(removed.debt.total_paid, dec!(600));
        assert_eq!(removed.debt.remaining_amount, dec!(0));
    }

    #[test]
    fn test_recompute_aggregate() {
        let debt = make_debt(dec!(1000));
        let payments = vec![make_payment(dec!(250)), make_payment(dec!(250))];

        let aggregate = DebtLedger::recompute_aggregate(&debt, &payments);
        assert_eq!(aggregate.total_paid, dec!(500));
        assert_eq!(aggregate.remaining_amount, dec!(500));
        assert!(!aggregate.is_paid);
    }

    #[test]
    fn test_recompute_aggregate_floors_remaining_at_zero() {
        // Drifted state: payments above total. The projection never reports
        // a negative remaining amount.
        let debt = make_debt(dec!(100));
        let payments = vec![make_payment(dec!(150))];

        let aggregate = DebtLedger::recompute_aggregate(&debt, &payments);
        assert_eq!(aggregate.remaining_amount, dec!(0));
        assert!(aggregate.is_paid);
    }

    #[test]
    fn test_total_change_below_paid_rejected() {
        let payments = vec![make_payment(dec!(600))];

        let result = DebtLedger::validate_total_change(&payments, dec!(500));
        match result {
            Err(TrosaError::TotalBelowPaid {
                total_paid,
                new_total,
            }) => {
                assert_eq!(total_paid, dec!(600));
                assert_eq!(new_total, dec!(500));
            }
            other => panic!("expected TotalBelowPaid, got {other:?}"),
        }
    }

    #[test]
    fn test_total_change_to_paid_sum_marks_paid() {
        let now = Utc::now();
        let debt = make_debt(dec!(1000));
        let payments = vec![make_payment(dec!(600))];

        let update = DebtLedger::apply_total_change(&debt, &payments, dec!(600), now).unwrap();
        assert!(update.is_paid);
        assert_eq!(update.date_paiement, Some(now));
        assert_eq!(update.remaining_amount, dec!(0));
    }

    #[test]
    fn test_total_raise_revives_paid_trosa() {
        let now = Utc::now();
        let debt = DebtState {
            montant_total: dec!(500),
            is_paid: true,
            date_paiement: Some(now),
        };
        let payments = vec![make_payment(dec!(500))];

        let update = DebtLedger::apply_total_change(&debt, &payments, dec!(800), now).unwrap();
        assert!(!update.is_paid);
        assert!(update.date_paiement.is_none());
        assert_eq!(update.remaining_amount, dec!(300));
    }

    #[test]
    fn test_non_positive_total_rejected() {
        assert!(matches!(
            DebtLedger::validate_total_change(&[], Decimal::ZERO),
            Err(TrosaError::NonPositiveTotal)
        ));
    }
}
