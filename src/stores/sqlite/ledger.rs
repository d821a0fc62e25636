//! Implements a SQLite backed ledger store.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::UtcOffset;

use crate::{
    Error, Transaction, TransactionBuilder, TransactionQuery, TransactionUpdate,
    database_id::TransactionId,
    stores::LedgerStore,
    timezone::today,
    transaction::{
        create_transaction, delete_transaction, get_transaction, query_transactions,
        sum_transactions, update_transaction,
    },
    user::UserID,
};

use super::lock_connection;

/// Stores transactions in a SQLite database.
///
/// The transaction table must exist, see [initialize](crate::initialize_db).
#[derive(Debug, Clone)]
pub struct SQLiteLedgerStore {
    connection: Arc<Mutex<Connection>>,
    local_offset: UtcOffset,
}

impl SQLiteLedgerStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// `local_offset` decides which date "today" is for transactions added without a date.
    pub fn new(connection: Arc<Mutex<Connection>>, local_offset: UtcOffset) -> Self {
        Self {
            connection,
            local_offset,
        }
    }
}

impl LedgerStore for SQLiteLedgerStore {
    /// Add a transaction to the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::Validation] if the amount is negative or not finite, or the category is blank,
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - or [Error::SqlError] if there is an SQL error.
    fn add(&mut self, builder: TransactionBuilder) -> Result<TransactionId, Error> {
        let new_transaction = builder.finalise(today(self.local_offset))?;
        let connection = lock_connection(&self.connection)?;

        let transaction = create_transaction(new_transaction, &connection)?;
        tracing::info!(
            "Transaction {} of {} added under {} as {} on {}",
            transaction.id,
            transaction.amount,
            transaction.category,
            transaction.transaction_type,
            transaction.date
        );

        Ok(transaction.id)
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        let connection = lock_connection(&self.connection)?;

        get_transaction(id, &connection)
    }

    fn update(&mut self, id: TransactionId, update: TransactionUpdate) -> Result<bool, Error> {
        if update.is_empty() {
            tracing::info!("No fields to update for transaction {id}");
            return Ok(false);
        }

        let connection = lock_connection(&self.connection)?;

        match update_transaction(id, update, &connection)? {
            0 => {
                tracing::info!("No transaction found with ID {id}");
                Ok(false)
            }
            _ => {
                tracing::info!("Transaction {id} updated");
                Ok(true)
            }
        }
    }

    fn delete(&mut self, id: TransactionId) -> Result<bool, Error> {
        let connection = lock_connection(&self.connection)?;

        match delete_transaction(id, &connection)? {
            0 => {
                tracing::info!("No transaction found with ID {id}");
                Ok(false)
            }
            _ => {
                tracing::info!("Transaction {id} deleted");
                Ok(true)
            }
        }
    }

    fn query(&self, user_id: UserID, query: &TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let connection = lock_connection(&self.connection)?;

        query_transactions(user_id, query, &connection)
    }

    fn sum_amount(&self, user_id: UserID, query: &TransactionQuery) -> Result<f64, Error> {
        let connection = lock_connection(&self.connection)?;

        sum_transactions(user_id, query, &connection)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::{UtcOffset, macros::date};

    use crate::{
        Error, Transaction, TransactionQuery, TransactionType, TransactionUpdate,
        ValidationError, db::initialize, stores::LedgerStore, timezone::today, user::UserID,
    };

    use super::SQLiteLedgerStore;

    fn get_store() -> SQLiteLedgerStore {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        SQLiteLedgerStore::new(Arc::new(Mutex::new(conn)), UtcOffset::UTC)
    }

    #[test]
    fn add_then_query_returns_same_fields() {
        let mut store = get_store();
        let user_id = UserID::new(1);

        let id = store
            .add(
                Transaction::build(user_id, TransactionType::Expense, "Food", 42.5)
                    .date(date!(2024 - 05 - 01)),
            )
            .unwrap();

        let transactions = store.query(user_id, &TransactionQuery::default()).unwrap();
        assert_eq!(
            transactions,
            vec![Transaction {
                id,
                user_id,
                transaction_type: TransactionType::Expense,
                category: "Food".to_owned(),
                amount: 42.5,
                date: date!(2024 - 05 - 01),
            }]
        );
    }

    #[test]
    fn add_without_date_uses_today() {
        let mut store = get_store();

        let id = store
            .add(Transaction::build(
                UserID::new(1),
                TransactionType::Income,
                "Salary",
                10.0,
            ))
            .unwrap();

        assert_eq!(store.get(id).unwrap().date, today(UtcOffset::UTC));
    }

    #[test]
    fn add_rejects_invalid_transaction_without_writing() {
        let mut store = get_store();
        let user_id = UserID::new(1);

        let result = store.add(Transaction::build(
            user_id,
            TransactionType::Expense,
            "Food",
            -5.0,
        ));

        assert_eq!(
            result,
            Err(Error::Validation(ValidationError::NegativeAmount(-5.0)))
        );
        assert_eq!(store.query(user_id, &TransactionQuery::default()), Ok(vec![]));
    }

    #[test]
    fn delete_missing_transaction_returns_false() {
        let mut store = get_store();

        assert_eq!(store.delete(9999), Ok(false));
    }

    #[test]
    fn delete_existing_transaction_returns_true() {
        let mut store = get_store();
        let id = store
            .add(Transaction::build(
                UserID::new(1),
                TransactionType::Expense,
                "Food",
                1.0,
            ))
            .unwrap();

        assert_eq!(store.delete(id), Ok(true));
        assert_eq!(store.get(id), Err(Error::NotFound));
    }

    #[test]
    fn update_amount_only_keeps_other_fields() {
        let mut store = get_store();
        let id = store
            .add(
                Transaction::build(UserID::new(1), TransactionType::Expense, "Food", 50.0)
                    .date(date!(2024 - 05 - 01)),
            )
            .unwrap();
        let before = store.get(id).unwrap();

        let updated = store.update(id, TransactionUpdate::default().amount(75.0));

        assert_eq!(updated, Ok(true));
        assert_eq!(
            store.get(id).unwrap(),
            Transaction {
                amount: 75.0,
                ..before
            }
        );
    }

    #[test]
    fn update_with_no_fields_returns_false() {
        let mut store = get_store();
        let id = store
            .add(Transaction::build(
                UserID::new(1),
                TransactionType::Expense,
                "Food",
                50.0,
            ))
            .unwrap();

        assert_eq!(store.update(id, TransactionUpdate::default()), Ok(false));
    }

    #[test]
    fn update_missing_transaction_returns_false() {
        let mut store = get_store();

        assert_eq!(
            store.update(9999, TransactionUpdate::default().category("Rent")),
            Ok(false)
        );
    }

    #[test]
    fn stores_share_one_connection() {
        let mut store = get_store();
        let other = store.clone();

        let id = store
            .add(Transaction::build(
                UserID::new(1),
                TransactionType::Income,
                "Salary",
                10.0,
            ))
            .unwrap();

        assert!(other.get(id).is_ok());
    }
}
