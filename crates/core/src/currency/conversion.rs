//! Currency conversion into the MGA base amount.
//!
//! Rounding strategy for converted amounts:
//! - Round to 2 decimal places, matching the monetary column precision
//! - Use banker's rounding (round half to even)
//! - MGA amounts pass through untouched

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use vola_shared::types::Currency;

use super::rates::RateTable;

/// Decimal places monetary amounts are stored at.
const MONEY_DP: u32 = 2;

/// Resolves the effective exchange rate for a movement.
///
/// MGA always converts at 1; any override is ignored. For other currencies
/// a positive caller-supplied override wins, otherwise the table default is
/// used. A zero or absent override means "use the default"; negative
/// overrides are rejected upstream before this is called.
#[must_use]
pub fn resolve_rate(
    currency: Currency,
    rate_override: Option<Decimal>,
    rates: &RateTable,
) -> Decimal {
    if currency.is_base() {
        return Decimal::ONE;
    }
    match rate_override {
        Some(rate) if rate > Decimal::ZERO => rate,
        _ => rates.rate_for(currency),
    }
}

/// Converts an amount into MGA using the resolved rate.
///
/// This is a total function: it is recomputed on every create and edit of a
/// movement, and the result is what gets persisted as `amount_mga` — a
/// client-supplied value is never trusted.
#[must_use]
pub fn normalize_to_base(
    amount: Decimal,
    currency: Currency,
    rate_override: Option<Decimal>,
    rates: &RateTable,
) -> Decimal {
    if currency.is_base() {
        return amount;
    }
    let rate = resolve_rate(currency, rate_override, rates);
    (amount * rate).round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_usd_default_rate() {
        // 100 USD * 4400 = 440,000 MGA
        let result = normalize_to_base(dec!(100), Currency::Usd, None, &RateTable::default());
        assert_eq!(result, dec!(440000));
    }

    #[rstest]
    #[case(Currency::Rmb, dec!(613))]
    #[case(Currency::Eur, dec!(5180))]
    #[case(Currency::Usd, dec!(4400))]
    #[case(Currency::Aed, dec!(1195))]
    fn test_default_rates_applied(#[case] currency: Currency, #[case] rate: Decimal) {
        let result = normalize_to_base(dec!(10), currency, None, &RateTable::default());
        assert_eq!(result, dec!(10) * rate);
    }

    #[test]
    fn test_mga_passes_through() {
        let table = RateTable::default();
        assert_eq!(
            normalize_to_base(dec!(123.45), Currency::Mga, None, &table),
            dec!(123.45)
        );
        // Override is ignored for the base currency
        assert_eq!(
            normalize_to_base(dec!(123.45), Currency::Mga, Some(dec!(99)), &table),
            dec!(123.45)
        );
    }

    #[test]
    fn test_override_takes_precedence() {
        let result =
            normalize_to_base(dec!(100), Currency::Rmb, Some(dec!(620)), &RateTable::default());
        assert_eq!(result, dec!(62000));
    }

    #[test]
    fn test_zero_override_falls_back_to_default() {
        let result =
            normalize_to_base(dec!(100), Currency::Rmb, Some(Decimal::ZERO), &RateTable::default());
        assert_eq!(result, dec!(61300));
    }

    #[test]
    fn test_bankers_rounding() {
        // 1 * 2.505 -> 2.50 (half to even), 1 * 2.515 -> 2.52
        let table = RateTable::default();
        assert_eq!(
            normalize_to_base(dec!(1), Currency::Usd, Some(dec!(2.505)), &table),
            dec!(2.50)
        );
        assert_eq!(
            normalize_to_base(dec!(1), Currency::Usd, Some(dec!(2.515)), &table),
            dec!(2.52)
        );
    }

    /// Strategy for positive amounts with 2 decimal places.
    fn positive_amount() -> impl Strategy<Value = Decimal> {
        (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    /// Strategy for positive whole-number rates, so that `amount * rate`
    /// stays within the stored 2-decimal precision and equality is exact.
    fn positive_rate() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000i64).prop_map(Decimal::from)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// For every non-base currency, the default-table conversion is
        /// exactly `amount * default_rate`.
        #[test]
        fn prop_default_rate_conversion(
            amount in positive_amount(),
            currency in prop::sample::select(vec![
                Currency::Rmb,
                Currency::Aed,
                Currency::Eur,
                Currency::Usd,
            ]),
        ) {
            let table = RateTable::default();
            let result = normalize_to_base(amount, currency, None, &table);
            prop_assert_eq!(result, amount * table.rate_for(currency));
        }

        /// MGA is the identity under any override.
        #[test]
        fn prop_mga_identity(
            amount in positive_amount(),
            rate in proptest::option::of(positive_rate()),
        ) {
            let result = normalize_to_base(amount, Currency::Mga, rate, &RateTable::default());
            prop_assert_eq!(result, amount);
        }

        /// A positive override always wins over the table default.
        #[test]
        fn prop_override_precedence(
            amount in positive_amount(),
            rate in positive_rate(),
        ) {
            let result = normalize_to_base(amount, Currency::Rmb, Some(rate), &RateTable::default());
            prop_assert_eq!(result, amount * rate);
        }
    }
}
