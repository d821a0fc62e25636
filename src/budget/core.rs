//! Defines the budget model and the SQL that stores budget limits.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::BudgetId,
    user::UserID,
    validation::{validate_amount, validate_category, validate_month},
};

/// A spending limit for one category in one calendar month.
///
/// There is at most one budget per user, category, month and year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The user the budget belongs to.
    pub user_id: UserID,
    /// The expense category the limit applies to.
    pub category: String,
    /// The most the user plans to spend in the category that month.
    pub amount: f64,
    /// The month, 1 = January.
    pub month: u8,
    /// The calendar year.
    pub year: i32,
}

/// Create the budget table in the database.
///
/// The unique constraint on (user_id, category, month, year) backs the
/// upsert in [upsert_budget].
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount >= 0),
                month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
                year INTEGER NOT NULL,
                UNIQUE(user_id, category, month, year)
                )",
        (),
    )?;

    Ok(())
}

/// Set the budget for `category` in `month`/`year`, replacing any existing amount.
///
/// The existence check and the write happen in one statement, so two calls
/// with the same key always leave exactly one row.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if the amount, category or month is invalid,
/// - or [Error::SqlError] if there is an SQL error.
pub fn upsert_budget(
    user_id: UserID,
    category: &str,
    amount: f64,
    month: u8,
    year: i32,
    connection: &Connection,
) -> Result<Budget, Error> {
    let category = validate_category(category)?;
    let amount = validate_amount(amount)?;
    validate_month(month)?;

    let budget = connection
        .prepare(
            "INSERT INTO budget (user_id, category, amount, month, year)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id, category, month, year) DO UPDATE SET amount = excluded.amount
             RETURNING id, user_id, category, amount, month, year",
        )?
        .query_row(
            (user_id.as_i64(), category, amount, month, year),
            map_budget_row,
        )?;

    Ok(budget)
}

/// Get the budgets of `user_id` for `month`/`year` in the order they were first set.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if `month` is not 1 to 12,
/// - or [Error::SqlError] if there is an SQL error.
pub fn get_budgets_for_month(
    user_id: UserID,
    month: u8,
    year: i32,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    validate_month(month)?;

    connection
        .prepare(
            "SELECT id, user_id, category, amount, month, year FROM budget
             WHERE user_id = ?1 AND month = ?2 AND year = ?3
             ORDER BY id ASC",
        )?
        .query_map((user_id.as_i64(), month, year), map_budget_row)?
        .map(|budget_result| budget_result.map_err(Error::SqlError))
        .collect()
}

/// Get every budget of `user_id`, oldest period first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_budgets_for_user(user_id: UserID, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, amount, month, year FROM budget
             WHERE user_id = :user_id
             ORDER BY year ASC, month ASC, id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_budget_row)?
        .map(|budget_result| budget_result.map_err(Error::SqlError))
        .collect()
}

/// Map a database row to a Budget.
pub fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category: row.get(2)?,
        amount: row.get(3)?,
        month: row.get(4)?,
        year: row.get(5)?,
    })
}
