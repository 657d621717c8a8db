//! Balance aggregation over movement rows.

use rust_decimal::Decimal;
use vola_shared::types::Currency;

use super::types::{BalanceTotals, CurrencyBuckets, DailyTotals, MovementAmounts};
use crate::movement::MovementType;

/// Folds movements into the overall cash position.
///
/// Entries add, exits subtract. RMB movements accumulate their face value
/// into the `rmb` bucket; everything else accumulates its normalized MGA
/// amount into the `mga` bucket.
#[must_use]
pub fn cash_balance(movements: &[MovementAmounts]) -> BalanceTotals {
    movements.iter().fold(BalanceTotals::default(), |mut acc, m| {
        let sign = match m.movement_type {
            MovementType::Entry => Decimal::ONE,
            MovementType::Exit => Decimal::NEGATIVE_ONE,
        };
        if m.currency == Currency::Rmb {
            acc.rmb += sign * m.amount;
        } else {
            acc.mga += sign * m.amount_mga;
        }
        acc
    })
}

/// Splits movements into entry and exit totals per bucket.
///
/// The caller restricts the row set to the day of interest; bucketing is the
/// same as [`cash_balance`].
#[must_use]
pub fn daily_totals(movements: &[MovementAmounts]) -> DailyTotals {
    movements.iter().fold(DailyTotals::default(), |mut acc, m| {
        let bucket = match m.movement_type {
            MovementType::Entry => &mut acc.entries,
            MovementType::Exit => &mut acc.exits,
        };
        add_to_bucket(bucket, m);
        acc
    })
}

fn add_to_bucket(bucket: &mut CurrencyBuckets, movement: &MovementAmounts) {
    if movement.currency == Currency::Rmb {
        bucket.rmb += movement.amount;
    } else {
        bucket.mga += movement.amount_mga;
    }
}
