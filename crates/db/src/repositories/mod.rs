//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Business rules stay in `vola-core`; repositories fetch
//! consistent snapshots, invoke the core, and persist the results
//! atomically.

pub mod balance;
pub mod movement;
pub mod trosa;

pub use balance::BalanceRepository;
pub use movement::{MovementRepoError, MovementRepository};
pub use trosa::{
    CreateTrosaInput, NewPaymentInput, TrosaFilter, TrosaRepoError, TrosaRepository,
    TrosaWithPayments, UpdateTrosaInput,
};
