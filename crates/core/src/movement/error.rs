//! Movement validation errors.

use thiserror::Error;

/// Errors that can occur when validating a movement.
#[derive(Debug, Error)]
pub enum MovementError {
    /// Amount must be positive.
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,

    /// Exchange rate override must not be negative.
    #[error("Exchange rate must not be negative")]
    NegativeExchangeRate,

    /// A required text field was empty.
    #[error("Required field is empty: {0}")]
    EmptyField(&'static str),
}

impl MovementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::NegativeExchangeRate => "NEGATIVE_EXCHANGE_RATE",
            Self::EmptyField(_) => "EMPTY_FIELD",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        // All movement errors are rejected input
        400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            MovementError::NonPositiveAmount.error_code(),
            "NON_POSITIVE_AMOUNT"
        );
        assert_eq!(
            MovementError::NegativeExchangeRate.error_code(),
            "NEGATIVE_EXCHANGE_RATE"
        );
        assert_eq!(
            MovementError::EmptyField("description").error_code(),
            "EMPTY_FIELD"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(MovementError::NonPositiveAmount.http_status_code(), 400);
        assert_eq!(MovementError::EmptyField("author").http_status_code(), 400);
    }
}
