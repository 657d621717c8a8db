//! Property-based tests for the debt ledger reconciler.
//!
//! The central invariant: after every accepted mutation, the payment sum
//! never exceeds the total owed and the paid flag equals
//! `sum(payments) >= montant_total`. Verified by replaying random add/remove
//! sequences against a trosa.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::TrosaError;
use super::reconcile::DebtLedger;
use super::types::{DebtState, PaymentRecord};

/// One step of a replayed payment history.
#[derive(Debug, Clone)]
enum Op {
    /// Attempt to add a payment of the given amount.
    Add(Decimal),
    /// Attempt to remove the payment at the given index (modulo the current
    /// set size).
    Remove(usize),
}

/// Strategy for positive payment amounts (0.01 to 500.00).
fn payment_amount() -> impl Strategy<Value = Decimal> {
    (1i64..50_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for debt totals (1.00 to 2,000.00).
fn debt_total() -> impl Strategy<Value = Decimal> {
    (100i64..200_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a random add/remove sequence.
fn op_sequence(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            3 => payment_amount().prop_map(Op::Add),
            1 => (0usize..8).prop_map(Op::Remove),
        ],
        1..=max_len,
    )
}

fn make_payment(montant: Decimal) -> PaymentRecord {
    PaymentRecord {
        id: Uuid::new_v4(),
        montant,
        date_paiement: Utc::now(),
        description: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// After every operation of any add/remove sequence, the payment sum is
    /// within the total and the paid flag matches the sum exactly.
    #[test]
    fn prop_invariant_holds_under_replay(
        total in debt_total(),
        ops in op_sequence(25),
    ) {
        let now = Utc::now();
        let mut debt = DebtState {
            montant_total: total,
            is_paid: false,
            date_paiement: None,
        };
        let mut payments: Vec<PaymentRecord> = Vec::new();

        for op in ops {
            let outcome = match op {
                Op::Add(montant) => {
                    DebtLedger::add_payment(&debt, &payments, make_payment(montant), now)
                }
                Op::Remove(seed) => {
                    if payments.is_empty() {
                        continue;
                    }
                    let id = payments[seed % payments.len()].id;
                    DebtLedger::remove_payment(&debt, &payments, id)
                }
            };

            if let Ok(reconciled) = outcome {
                payments = reconciled.payments;
                debt.is_paid = reconciled.debt.is_paid;
                debt.date_paiement = reconciled.debt.date_paiement;
            }
            // A rejected operation leaves the snapshot untouched; either
            // way the invariant must hold now.

            let sum = DebtLedger::total_paid(&payments);
            prop_assert!(
                sum <= debt.montant_total,
                "payment sum {} exceeded total {}",
                sum,
                debt.montant_total
            );
            prop_assert_eq!(
                debt.is_paid,
                sum >= debt.montant_total,
                "paid flag inconsistent with payment sum"
            );
        }
    }

    /// A paid trosa always has a settlement timestamp; an active one never
    /// does.
    #[test]
    fn prop_date_paiement_tracks_status(
        total in debt_total(),
        ops in op_sequence(25),
    ) {
        let now = Utc::now();
        let mut debt = DebtState {
            montant_total: total,
            is_paid: false,
            date_paiement: None,
        };
        let mut payments: Vec<PaymentRecord> = Vec::new();

        for op in ops {
            let outcome = match op {
                Op::Add(montant) => {
                    DebtLedger::add_payment(&debt, &payments, make_payment(montant), now)
                }
                Op::Remove(seed) => {
                    if payments.is_empty() {
                        continue;
                    }
                    let id = payments[seed % payments.len()].id;
                    DebtLedger::remove_payment(&debt, &payments, id)
                }
            };

            if let Ok(reconciled) = outcome {
                payments = reconciled.payments;
                debt.is_paid = reconciled.debt.is_paid;
                debt.date_paiement = reconciled.debt.date_paiement;
            }

            prop_assert_eq!(debt.is_paid, debt.date_paiement.is_some());
        }
    }

    /// The read-side projection is idempotent: computing it twice over the
    /// same snapshot yields identical results.
    #[test]
    fn prop_recompute_aggregate_idempotent(
        total in debt_total(),
        amounts in prop::collection::vec(payment_amount(), 0..10),
    ) {
        let debt = DebtState {
            montant_total: total,
            is_paid: false,
            date_paiement: None,
        };
        let payments: Vec<PaymentRecord> = amounts.into_iter().map(make_payment).collect();

        let first = DebtLedger::recompute_aggregate(&debt, &payments);
        let second = DebtLedger::recompute_aggregate(&debt, &payments);
        prop_assert_eq!(first, second);
    }

    /// The projection never reports a negative remaining amount, even over
    /// drifted snapshots.
    #[test]
    fn prop_remaining_never_negative(
        total in debt_total(),
        amounts in prop::collection::vec(payment_amount(), 0..10),
    ) {
        let debt = DebtState {
            montant_total: total,
            is_paid: false,
            date_paiement: None,
        };
        let payments: Vec<PaymentRecord> = amounts.into_iter().map(make_payment).collect();

        let aggregate = DebtLedger::recompute_aggregate(&debt, &payments);
        prop_assert!(aggregate.remaining_amount >= Decimal::ZERO);
    }

    /// Adding a payment and immediately removing it restores the original
    /// sum and status.
    #[test]
    fn prop_add_then_remove_restores_sum(
        total in debt_total(),
        montant in payment_amount(),
    ) {
        let now = Utc::now();
        let debt = DebtState {
            montant_total: total,
            is_paid: false,
            date_paiement: None,
        };

        // A payment larger than the total would be rejected; rejection is
        // covered by the replay property.
        prop_assume!(montant <= total);

        let payment = make_payment(montant);
        let payment_id = payment.id;

        let added = DebtLedger::add_payment(&debt, &[], payment, now).unwrap();

        let mid_debt = DebtState {
            montant_total: total,
            is_paid: added.debt.is_paid,
            date_paiement: added.debt.date_paiement,
        };
        let removed = DebtLedger::remove_payment(&mid_debt, &added.payments, payment_id).unwrap();

        prop_assert_eq!(removed.debt.total_paid, Decimal::ZERO);
        prop_assert!(!removed.debt.is_paid);
        prop_assert!(removed.debt.date_paiement.is_none());
        prop_assert!(removed.payments.is_empty());
    }

    /// Lowering the total below the paid sum is always rejected.
    #[test]
    fn prop_total_change_never_undercuts_payments(
        amounts in prop::collection::vec(payment_amount(), 1..10),
        new_total in debt_total(),
    ) {
        let payments: Vec<PaymentRecord> = amounts.into_iter().map(make_payment).collect();
        let total_paid = DebtLedger::total_paid(&payments);

        let result = DebtLedger::validate_total_change(&payments, new_total);
        if new_total < total_paid {
            prop_assert!(
                matches!(result, Err(TrosaError::TotalBelowPaid { .. })),
                "expected TotalBelowPaid error"
            );
        } else {
            prop_assert!(result.is_ok());
        }
    }
}
