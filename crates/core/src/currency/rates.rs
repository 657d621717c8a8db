//! Default exchange rate table.

use std::collections::HashMap;

use rust_decimal::Decimal;
use vola_shared::types::Currency;

/// Exchange rates into MGA, one per supported currency.
///
/// The table is built from deployment configuration at startup and injected
/// into every caller, so operators can adjust rates without a code change
/// and tests can substitute their own.
#[derive(Debug, Clone)]
pub struct RateTable {
    rates: HashMap<Currency, Decimal>,
}

impl Default for RateTable {
    /// Reference rates at the time of writing.
    fn default() -> Self {
        Self::from_pairs([
            (Currency::Mga, Decimal::ONE),
            (Currency::Rmb, Decimal::from(613)),
            (Currency::Eur, Decimal::from(5180)),
            (Currency::Usd, Decimal::from(4400)),
            (Currency::Aed, Decimal::from(1195)),
        ])
    }
}

impl RateTable {
    /// Builds a rate table from (currency, rate) pairs.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Currency, Decimal)>) -> Self {
        Self {
            rates: pairs.into_iter().collect(),
        }
    }

    /// Returns the default rate into MGA for a currency.
    ///
    /// Falls back to 1 for a currency with no entry. That fallback is
    /// defensive only: every supported currency has an entry in a correctly
    /// configured table.
    #[must_use]
    pub fn rate_for(&self, currency: Currency) -> Decimal {
        self.rates.get(&currency).copied().unwrap_or(Decimal::ONE)
    }
}
