//! Collects everything stored for one user, for inspecting the database by hand.

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Budget, Error, Transaction, TransactionQuery,
    budget::get_budgets_for_user,
    transaction::query_transactions,
    user::{User, UserID, get_user_by_id},
};

/// A user's account together with all of their transactions and budgets.
///
/// The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataDump {
    /// The user the data belongs to.
    pub user: User,
    /// Every transaction, in the order they were added.
    pub transactions: Vec<Transaction>,
    /// Every budget, oldest period first.
    pub budgets: Vec<Budget>,
}

/// Read all data stored for `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `user_id` does not refer to a registered user,
/// - or [Error::SqlError] if there is an SQL error.
pub fn dump_user_data(user_id: UserID, connection: &Connection) -> Result<DataDump, Error> {
    let user = get_user_by_id(user_id, connection)?;
    let transactions = query_transactions(user_id, &TransactionQuery::default(), connection)?;
    let budgets = get_budgets_for_user(user_id, connection)?;

    tracing::debug!(
        "Dumped {} transactions and {} budgets for user {user_id}",
        transactions.len(),
        budgets.len()
    );

    Ok(DataDump {
        user,
        transactions,
        budgets,
    })
}
