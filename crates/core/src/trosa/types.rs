//! Trosa domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Settlement status of a trosa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrosaStatus {
    /// Payments so far are below the total owed.
    Active,
    /// Payments cover the total owed.
    Paid,
}

impl TrosaStatus {
    /// Returns true if the trosa is fully paid.
    #[must_use]
    pub const fn is_paid(self) -> bool {
        matches!(self, Self::Paid)
    }
}

impl std::str::FromStr for TrosaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "paid" => Ok(Self::Paid),
            _ => Err(format!("Unknown trosa status: {s}")),
        }
    }
}

/// The slice of a stored trosa the reconciler operates on.
#[derive(Debug, Clone)]
pub struct DebtState {
    /// Total amount owed.
    pub montant_total: Decimal,
    /// Stored paid flag.
    pub is_paid: bool,
    /// When the trosa became fully paid, if it is.
    pub date_paiement: Option<DateTime<Utc>>,
}

/// A single payment applied against a trosa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Payment ID.
    pub id: Uuid,
    /// Amount paid (positive).
    pub montant: Decimal,
    /// When the payment was made.
    pub date_paiement: DateTime<Utc>,
    /// Optional free-text note.
    pub description: Option<String>,
}

/// The derived trosa fields to persist after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtUpdate {
    /// Whether the trosa is now fully paid.
    pub is_paid: bool,
    /// Settlement timestamp; set on the transition to paid, cleared on the
    /// transition back.
    pub date_paiement: Option<DateTime<Utc>>,
    /// Sum of all payments after the mutation.
    pub total_paid: Decimal,
    /// Amount still owed after the mutation.
    pub remaining_amount: Decimal,
}

/// Result of a payment mutation: the new payment set plus the derived trosa
/// fields, both of which the caller persists atomically.
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// The payment set after the mutation.
    pub payments: Vec<PaymentRecord>,
    /// The derived trosa fields.
    pub debt: DebtUpdate,
}

/// Read-side projection of a trosa's payment state.
///
/// Computed fresh on every list/detail view rather than trusting the stored
/// paid flag, as a consistency self-check against drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrosaAggregate {
    /// Sum of all payments.
    pub total_paid: Decimal,
    /// Amount still owed, floored at zero.
    pub remaining_amount: Decimal,
    /// Whether payments cover the total.
    pub is_paid: bool,
}
