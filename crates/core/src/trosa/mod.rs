//! Debt ledger reconciliation.
//!
//! A trosa is an amount owed by a named debtor, paid down by individual
//! payments. This module maintains the derived paid/remaining/status fields
//! under one hard invariant: the sum of a trosa's payments never exceeds its
//! total, and the paid flag is always exactly consistent with that sum.

pub mod error;
pub mod reconcile;
pub mod types;

#[cfg(test)]
mod reconcile_props;

pub use error::TrosaError;
pub use reconcile::DebtLedger;
pub use types::{
    DebtState, DebtUpdate, PaymentRecord, Reconciled, TrosaAggregate, TrosaStatus,
};
