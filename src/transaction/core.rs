//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, ValidationError,
    database_id::TransactionId,
    user::UserID,
    validation::{validate_amount, validate_category},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, e.g. salary.
    Income,
    /// Money going out, e.g. rent or groceries.
    Expense,
}

impl TransactionType {
    /// The lower case name stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(ValidationError::InvalidTransactionType(s.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that recorded the transaction.
    pub user_id: UserID,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// A free-text label such as "Food" or "Salary".
    pub category: String,
    /// The amount of money spent or earned, never negative.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
}

impl Transaction {
    /// Start building a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        user_id: UserID,
        transaction_type: TransactionType,
        category: &str,
        amount: f64,
    ) -> TransactionBuilder {
        TransactionBuilder {
            user_id,
            transaction_type,
            category: category.to_owned(),
            amount,
            date: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The date is optional and defaults to today when the transaction is added
/// to a ledger. Call [TransactionBuilder::finalise] to validate the fields.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// The category label, trimmed during validation.
    pub category: String,
    /// The amount of money. Must be finite and not negative.
    pub amount: f64,
    /// When the transaction happened, `None` means today.
    pub date: Option<Date>,
}

impl TransactionBuilder {
    /// Set the date of the transaction.
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Check the fields and fill in a missing date with `today`.
    ///
    /// # Errors
    /// Returns a [ValidationError] if the amount is negative or not finite,
    /// or the category is blank.
    pub fn finalise(self, today: Date) -> Result<NewTransaction, ValidationError> {
        Ok(NewTransaction {
            user_id: self.user_id,
            transaction_type: self.transaction_type,
            category: validate_category(&self.category)?,
            amount: validate_amount(self.amount)?,
            date: self.date.unwrap_or(today),
        })
    }
}

/// A transaction that passed validation and is ready to be inserted.
///
/// Created by [TransactionBuilder::finalise].
#[derive(Debug, PartialEq, Clone)]
pub struct NewTransaction {
    user_id: UserID,
    transaction_type: TransactionType,
    category: String,
    amount: f64,
    date: Date,
}

impl NewTransaction {
    /// When the transaction happened.
    pub fn date(&self) -> Date {
        self.date
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Insert a validated transaction into the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, type, category, amount, date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_id, type, category, amount, date",
        )?
        .query_row(
            (
                transaction.user_id.as_i64(),
                transaction.transaction_type,
                transaction.category,
                transaction.amount,
                transaction.date,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, type, category, amount, date FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

type RowsAffected = usize;

/// Delete the transaction with `id`.
///
/// Returns the number of rows deleted, zero if `id` did not match.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id",
            &[(":id", &id)],
        )
        .map_err(|err| err.into())
}

/// Create the transaction table in the database.
///
/// The table has no foreign key to the user table, the ledger trusts the
/// user IDs it is given.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount >= 0),
                date TEXT NOT NULL
                )",
        (),
    )?;

    // Add composite index used by the report queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let transaction_type = row.get(2)?;
    let category = row.get(3)?;
    let amount = row.get(4)?;
    let date = row.get(5)?;

    Ok(Transaction {
        id,
        user_id,
        transaction_type,
        category,
        amount,
        date,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, Transaction, TransactionType,
        db::initialize,
        transaction::{create_transaction, delete_transaction, get_transaction},
        user::UserID,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let new_transaction =
            Transaction::build(UserID::new(1), TransactionType::Expense, " Food ", 12.3)
                .date(date!(2024 - 05 - 01))
                .finalise(date!(2024 - 05 - 20))
                .unwrap();

        let transaction = create_transaction(new_transaction, &conn).unwrap();

        assert_eq!(
            transaction,
            Transaction {
                id: 1,
                user_id: UserID::new(1),
                transaction_type: TransactionType::Expense,
                category: "Food".to_owned(),
                amount: 12.3,
                date: date!(2024 - 05 - 01),
            }
        );
    }

    #[test]
    fn get_returns_created_transaction() {
        let conn = get_test_connection();
        let new_transaction =
            Transaction::build(UserID::new(1), TransactionType::Income, "Salary", 1000.0)
                .finalise(date!(2024 - 05 - 20))
                .unwrap();
        let want = create_transaction(new_transaction, &conn).unwrap();

        let got = get_transaction(want.id, &conn).unwrap();

        assert_eq!(want, got);
    }

    #[test]
    fn get_fails_on_missing_id() {
        let conn = get_test_connection();

        assert_eq!(get_transaction(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_reports_rows_affected() {
        let conn = get_test_connection();
        let new_transaction =
            Transaction::build(UserID::new(1), TransactionType::Income, "Salary", 1000.0)
                .finalise(date!(2024 - 05 - 20))
                .unwrap();
        let transaction = create_transaction(new_transaction, &conn).unwrap();

        assert_eq!(delete_transaction(transaction.id, &conn), Ok(1));
        assert_eq!(delete_transaction(transaction.id, &conn), Ok(0));
        assert_eq!(get_transaction(transaction.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn table_rejects_negative_amount() {
        let conn = get_test_connection();

        let result = conn.execute(
            "INSERT INTO \"transaction\" (user_id, type, category, amount, date)
             VALUES (1, 'expense', 'Food', -1.0, '2024-05-01')",
            (),
        );

        assert!(result.is_err());
    }
}
