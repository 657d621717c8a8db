//! Movement resolution service.
//!
//! Pure validation and normalization with no database dependencies. The
//! create and edit paths both go through [`MovementService::resolve`], so a
//! stored `amount_mga` is always the recomputed one.

use rust_decimal::Decimal;

use super::error::MovementError;
use super::types::{MovementInput, ResolvedMovement};
use crate::currency::{RateTable, normalize_to_base, resolve_rate};

/// Movement validation and resolution.
pub struct MovementService;

impl MovementService {
    /// Validates a movement input and resolves its effective exchange rate
    /// and normalized MGA amount.
    ///
    /// A zero or absent rate override falls back to the table default; a
    /// negative override is rejected rather than silently coerced.
    ///
    /// # Errors
    ///
    /// Returns `MovementError` if the input is invalid.
    pub fn resolve(
        input: &MovementInput,
        rates: &RateTable,
    ) -> Result<ResolvedMovement, MovementError> {
        if input.amount <= Decimal::ZERO {
            return Err(MovementError::NonPositiveAmount);
        }

        if let Some(rate) = input.exchange_rate
            && rate < Decimal::ZERO
        {
            return Err(MovementError::NegativeExchangeRate);
        }

        if input.description.trim().is_empty() {
            return Err(MovementError::EmptyField("description"));
        }
        if input.author.trim().is_empty() {
            return Err(MovementError::EmptyField("author"));
        }
        if input.responsible.trim().is_empty() {
            return Err(MovementError::EmptyField("responsible"));
        }

        let exchange_rate = resolve_rate(input.currency, input.exchange_rate, rates);
        let amount_mga = normalize_to_base(input.amount, input.currency, input.exchange_rate, rates);

        Ok(ResolvedMovement {
            movement_type: input.movement_type,
            currency: input.currency,
            amount: input.amount,
            exchange_rate,
            amount_mga,
            description: input.description.clone(),
            date: input.date,
            author: input.author.clone(),
            responsible: input.responsible.clone(),
        })
    }
}
