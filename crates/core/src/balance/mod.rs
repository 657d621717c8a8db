//! Aggregate balance projections over movements.
//!
//! Pure read-side computations: the repository layer fetches movement rows
//! and these functions fold them into dashboard totals.

pub mod aggregate;
pub mod types;

pub use aggregate::{cash_balance, daily_totals};
pub use types::{BalanceTotals, CurrencyBuckets, DailyTotals, MovementAmounts};
