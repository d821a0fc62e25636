//! Implements a struct that holds the shared database connection and builds the stores on top of it.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use time::UtcOffset;

use crate::{
    BudgetEvaluator, Error, Reporter,
    db::initialize,
    stores::sqlite::{SQLiteBudgetStore, SQLiteLedgerStore, lock_connection},
    timezone::get_local_offset,
};

/// The state shared by every operation in a session.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The UTC offset of `local_timezone`, used to decide which date is "today".
    pub local_offset: UtcOffset,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an:
    /// - [Error::InvalidTimezoneError] if `local_timezone` is not a known timezone,
    /// - or [Error::SqlError] if the database cannot be initialized.
    pub fn new(db_connection: Connection, local_timezone: &str) -> Result<Self, Error> {
        let local_offset = get_local_offset(local_timezone).ok_or_else(|| {
            tracing::error!("Invalid timezone {local_timezone}");
            Error::InvalidTimezoneError(local_timezone.to_owned())
        })?;

        initialize(&db_connection)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            local_offset,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }

    /// Lock the shared connection for direct queries.
    ///
    /// # Errors
    /// Returns [Error::DatabaseLockError] if the lock is poisoned.
    pub fn lock_connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        lock_connection(&self.db_connection)
    }

    /// A ledger store backed by the shared connection.
    pub fn ledger_store(&self) -> SQLiteLedgerStore {
        SQLiteLedgerStore::new(self.db_connection.clone(), self.local_offset)
    }

    /// A budget store backed by the shared connection.
    pub fn budget_store(&self) -> SQLiteBudgetStore {
        SQLiteBudgetStore::new(self.db_connection.clone())
    }

    /// A reporter that reads from [AppState::ledger_store].
    pub fn reporter(&self) -> Reporter<SQLiteLedgerStore> {
        Reporter::new(self.ledger_store())
    }

    /// A budget evaluator that reads from the ledger and budget stores.
    pub fn budget_evaluator(&self) -> BudgetEvaluator<SQLiteLedgerStore, SQLiteBudgetStore> {
        BudgetEvaluator::new(self.ledger_store(), self.budget_store())
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{UtcOffset, macros::date};

    use crate::{
        Error, Transaction, TransactionType,
        stores::{BudgetStore, LedgerStore},
        user::UserID,
    };

    use super::AppState;

    #[test]
    fn new_initializes_database() {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Etc/UTC").unwrap();

        assert_eq!(state.local_offset, UtcOffset::UTC);
        let count: i64 = state
            .db_connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(id) FROM budget", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn new_rejects_unknown_timezone() {
        let result = AppState::new(Connection::open_in_memory().unwrap(), "Middle/Earth");

        assert_eq!(
            result.map(|_| ()),
            Err(Error::InvalidTimezoneError("Middle/Earth".to_owned()))
        );
    }

    #[test]
    fn lock_connection_reports_poisoned_lock() {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Etc/UTC").unwrap();
        let poisoner = state.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.db_connection.lock().unwrap();
            panic!("poison the connection lock");
        })
        .join();

        assert_eq!(
            state.lock_connection().map(|_| ()),
            Err(Error::DatabaseLockError)
        );
    }

    #[test]
    fn lock_connection_gives_usable_connection() {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Etc/UTC").unwrap();

        let count: i64 = state
            .lock_connection()
            .unwrap()
            .query_row("SELECT COUNT(id) FROM user", [], |row| row.get(0))
            .unwrap();

        assert_eq!(count, 0);
    }

    #[test]
    fn stores_share_the_connection() {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Etc/UTC").unwrap();
        let user_id = UserID::new(1);
        state
            .ledger_store()
            .add(
                Transaction::build(user_id, TransactionType::Expense, "Food", 120.0)
                    .date(date!(2024 - 05 - 02)),
            )
            .unwrap();
        state
            .budget_store()
            .set_budget(user_id, "Food", 100.0, 5, 2024)
            .unwrap();

        let exceedances = state
            .budget_evaluator()
            .check_exceedance(user_id, 5, 2024)
            .unwrap();
        let report = state.reporter().monthly_report(user_id, 5, 2024).unwrap();

        assert_eq!(exceedances.len(), 1);
        assert_eq!(report.total_expenses, 120.0);
    }
}
