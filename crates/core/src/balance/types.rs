//! Balance projection types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vola_shared::types::Currency;

use crate::movement::MovementType;

/// The slice of a movement row the balance projections need.
#[derive(Debug, Clone)]
pub struct MovementAmounts {
    /// Direction of the movement.
    pub movement_type: MovementType,
    /// Currency the amount is denominated in.
    pub currency: Currency,
    /// Amount in `currency`.
    pub amount: Decimal,
    /// Amount normalized into MGA.
    pub amount_mga: Decimal,
}

/// Overall cash position.
///
/// RMB is tracked in its own bucket at face value; every other currency is
/// folded into the normalized MGA bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceTotals {
    /// Net MGA-normalized balance of non-RMB movements.
    pub mga: Decimal,
    /// Net RMB balance at face value.
    pub rmb: Decimal,
}

/// Per-bucket totals for one movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CurrencyBuckets {
    /// MGA-normalized total of non-RMB movements.
    pub mga: Decimal,
    /// RMB total at face value.
    pub rmb: Decimal,
}

/// Today's entry and exit totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyTotals {
    /// Totals of incoming movements.
    pub entries: CurrencyBuckets,
    /// Totals of outgoing movements.
    pub exits: CurrencyBuckets,
}
