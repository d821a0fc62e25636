//! Traits for the durable stores the report and budget engines read from.
//!
//! The engines are generic over these traits, so they can be run against
//! the SQLite stores in [sqlite] or against test doubles.

mod budget;
mod ledger;

pub mod sqlite;

pub use budget::BudgetStore;
pub use ledger::LedgerStore;
