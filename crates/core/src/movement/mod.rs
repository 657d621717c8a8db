//! Cash movement validation and resolution.
//!
//! A movement is a single entry or exit in the ledger. Resolution validates
//! the input and recomputes the normalized MGA amount on every write.

pub mod error;
pub mod service;
pub mod types;

pub use error::MovementError;
pub use service::MovementService;
pub use types::{MovementInput, MovementType, ResolvedMovement};
