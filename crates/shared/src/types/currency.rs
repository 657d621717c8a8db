//! Supported currency codes.
//!
//! Currencies are stored as text in the database and validated here on every
//! write; storage-level enforcement is deliberately not relied upon.

use serde::{Deserialize, Serialize};

/// Currency codes supported by the ledger.
///
/// MGA is the base accounting currency every amount is normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Malagasy Ariary (base currency)
    Mga,
    /// Chinese Renminbi
    Rmb,
    /// UAE Dirham
    Aed,
    /// Euro
    Eur,
    /// US Dollar
    Usd,
}

impl Currency {
    /// Returns true for the base accounting currency.
    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(self, Self::Mga)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mga => write!(f, "MGA"),
            Self::Rmb => write!(f, "RMB"),
            Self::Aed => write!(f, "AED"),
            Self::Eur => write!(f, "EUR"),
            Self::Usd => write!(f, "USD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MGA" => Ok(Self::Mga),
            "RMB" => Ok(Self::Rmb),
            "AED" => Ok(Self::Aed),
            "EUR" => Ok(Self::Eur),
            "USD" => Ok(Self::Usd),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}
