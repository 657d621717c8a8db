//! Trosa error types for validation and invariant violations.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during trosa operations.
#[derive(Debug, Error)]
pub enum TrosaError {
    // ========== Validation Errors ==========
    /// Payment amount must be positive.
    #[error("Payment amount must be greater than 0")]
    NonPositiveAmount,

    /// Total amount must be positive.
    #[error("Total amount must be greater than 0")]
    NonPositiveTotal,

    // ========== Invariant Violations ==========
    /// The trosa is already fully paid; no further payments are accepted.
    #[error("This trosa is already fully paid")]
    AlreadyPaid,

    /// The payment would push the paid sum past the total owed.
    #[error("Payment of {attempted} MGA exceeds the remaining balance ({remaining} MGA)")]
    ExceedsRemaining {
        /// The rejected payment amount.
        attempted: Decimal,
        /// The exact amount still owed, so the caller can correct the input.
        remaining: Decimal,
    },

    /// The new total would fall below the amount already paid.
    #[error("New total {new_total} is below the amount already paid ({total_paid})")]
    TotalBelowPaid {
        /// Sum of the recorded payments.
        total_paid: Decimal,
        /// The rejected new total.
        new_total: Decimal,
    },

    // ========== Not Found ==========
    /// The referenced payment does not belong to this trosa.
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),
}

impl TrosaError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::NonPositiveTotal => "NON_POSITIVE_TOTAL",
            Self::AlreadyPaid => "ALREADY_PAID",
            Self::ExceedsRemaining { .. } => "EXCEEDS_REMAINING",
            Self::TotalBelowPaid { .. } => "TOTAL_BELOW_PAID",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation and invariant errors
            Self::NonPositiveAmount
            | Self::NonPositiveTotal
            | Self::AlreadyPaid
            | Self::ExceedsRemaining { .. }
            | Self::TotalBelowPaid { .. } => 400,

            // 404 Not Found
            Self::PaymentNotFound(_) => 404,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(TrosaError::AlreadyPaid.error_code(), "ALREADY_PAID");
        assert_eq!(
            TrosaError::ExceedsRemaining {
                attempted: dec!(600),
                remaining: dec!(500),
            }
            .error_code(),
            "EXCEEDS_REMAINING"
        );
        assert_eq!(
            TrosaError::PaymentNotFound(Uuid::nil()).error_code(),
            "PAYMENT_NOT_FOUND"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(TrosaError::NonPositiveAmount.http_status_code(), 400);
        assert_eq!(TrosaError::AlreadyPaid.http_status_code(), 400);
        assert_eq!(
            TrosaError::PaymentNotFound(Uuid::nil()).http_status_code(),
            404
        );
    }

    #[test]
    fn test_exceeds_remaining_cites_exact_figure() {
        let err = TrosaError::ExceedsRemaining {
            attempted: dec!(600),
            remaining: dec!(500),
        };
        assert_eq!(
            err.to_string(),
            "Payment of 600 MGA exceeds the remaining balance (500 MGA)"
        );
    }
}
