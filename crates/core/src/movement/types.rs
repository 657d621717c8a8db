//! Movement domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vola_shared::types::Currency;

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Cash coming in.
    Entry,
    /// Cash going out.
    Exit,
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entry => write!(f, "entry"),
            Self::Exit => write!(f, "exit"),
        }
    }
}

impl std::str::FromStr for MovementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "entry" => Ok(Self::Entry),
            "exit" => Ok(Self::Exit),
            _ => Err(format!("Unknown movement type: {s}")),
        }
    }
}

/// Input for creating or editing a movement, before resolution.
#[derive(Debug, Clone)]
pub struct MovementInput {
    /// Direction of the movement.
    pub movement_type: MovementType,
    /// Currency the amount is denominated in.
    pub currency: Currency,
    /// Amount in `currency` (must be positive).
    pub amount: Decimal,
    /// Optional exchange rate override into MGA.
    pub exchange_rate: Option<Decimal>,
    /// What the movement was for.
    pub description: String,
    /// When the movement happened.
    pub date: DateTime<Utc>,
    /// Display name of the user recording the movement.
    pub author: String,
    /// The user accountable for the movement.
    pub responsible: String,
}

/// A movement with its effective rate and normalized amount resolved.
///
/// `amount_mga` is always derived here, never taken from client input.
#[derive(Debug, Clone)]
pub struct ResolvedMovement {
    /// Direction of the movement.
    pub movement_type: MovementType,
    /// Currency the amount is denominated in.
    pub currency: Currency,
    /// Amount in `currency`.
    pub amount: Decimal,
    /// The exchange rate that was applied (1 for MGA).
    pub exchange_rate: Decimal,
    /// The amount normalized into MGA.
    pub amount_mga: Decimal,
    /// What the movement was for.
    pub description: String,
    /// When the movement happened.
    pub date: DateTime<Utc>,
    /// Display name of the user recording the movement.
    pub author: String,
    /// The user accountable for the movement.
    pub responsible: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_movement_type_round_trip() {
        assert_eq!(MovementType::from_str("entry").unwrap(), MovementType::Entry);
        assert_eq!(MovementType::from_str("EXIT").unwrap(), MovementType::Exit);
        assert_eq!(MovementType::Entry.to_string(), "entry");
        assert_eq!(MovementType::Exit.to_string(), "exit");
    }

    #[test]
    fn test_movement_type_unknown() {
        assert!(MovementType::from_str("transfer").is_err());
    }
}
