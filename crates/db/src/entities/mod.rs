//! `SeaORM` entity definitions.
//!
//! Enumerated fields (movement type, currency) are stored as text and
//! validated at the application boundary on every write; storage-level
//! enforcement is deliberately not relied upon.

pub mod movements;
pub mod trosa;
pub mod trosa_payments;
