//! SQLite backed implementations of the store traits.
//!
//! Every store holds a handle to the same shared connection and locks it for
//! the duration of a single operation.

mod budget;
mod ledger;

pub use budget::SQLiteBudgetStore;
pub use ledger::SQLiteLedgerStore;

use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::Error;

/// Lock the shared connection, logging and converting a poisoned lock.
pub(crate) fn lock_connection(
    connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|error| {
        tracing::error!("Could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}
