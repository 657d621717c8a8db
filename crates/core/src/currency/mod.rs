//! Normalization of amounts into the MGA base currency.

pub mod conversion;
pub mod rates;

pub use conversion::{normalize_to_base, resolve_rate};
pub use rates::RateTable;
