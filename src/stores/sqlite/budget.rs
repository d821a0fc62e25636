//! Implements a SQLite backed budget store.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Budget, Error,
    budget::{get_budgets_for_month, upsert_budget},
    stores::BudgetStore,
    user::UserID,
};

use super::lock_connection;

/// Stores monthly category budgets in a SQLite database.
///
/// The budget table must exist, see [initialize](crate::initialize_db).
#[derive(Debug, Clone)]
pub struct SQLiteBudgetStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteBudgetStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl BudgetStore for SQLiteBudgetStore {
    /// Insert or replace the budget for the (user, category, month, year) key.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::Validation] if the amount, category or month is invalid,
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - or [Error::SqlError] if there is an SQL error.
    fn set_budget(
        &mut self,
        user_id: UserID,
        category: &str,
        amount: f64,
        month: u8,
        year: i32,
    ) -> Result<Budget, Error> {
        let connection = lock_connection(&self.connection)?;

        let budget = upsert_budget(user_id, category, amount, month, year, &connection)?;
        tracing::info!(
            "Set budget {} for {} in {}/{} to {}",
            budget.id,
            budget.category,
            budget.month,
            budget.year,
            budget.amount
        );

        Ok(budget)
    }

    fn list_budgets(&self, user_id: UserID, month: u8, year: i32) -> Result<Vec<Budget>, Error> {
        let connection = lock_connection(&self.connection)?;

        let budgets = get_budgets_for_month(user_id, month, year, &connection)?;
        if budgets.is_empty() {
            tracing::debug!("No budgets set for user {user_id} in {month}/{year}");
        }

        Ok(budgets)
    }
}
