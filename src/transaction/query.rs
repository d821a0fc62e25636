//! Filtered reads and sums over a user's transactions.

use std::ops::RangeInclusive;

use rusqlite::{Connection, params_from_iter, types::Value};
use time::Date;

use crate::{Error, user::UserID};

use super::{Transaction, TransactionType, map_transaction_row};

/// Defines which of a user's transactions a query should match.
///
/// Unset filters match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Only match income or only match expenses.
    pub transaction_type: Option<TransactionType>,
    /// Only match this category (exact match).
    pub category: Option<String>,
    /// Include transactions within `date_range` (inclusive).
    pub date_range: Option<RangeInclusive<Date>>,
}

impl TransactionQuery {
    /// Only match transactions of `transaction_type`.
    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    /// Only match transactions in `category`.
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_owned());
        self
    }

    /// Only match transactions dated within `date_range`.
    pub fn date_range(mut self, date_range: RangeInclusive<Date>) -> Self {
        self.date_range = Some(date_range);
        self
    }

    /// Build the WHERE clause and its positional parameters.
    fn where_clause(&self, user_id: UserID) -> (String, Vec<Value>) {
        let mut where_clause_parts = vec!["user_id = ?1".to_owned()];
        let mut query_parameters = vec![Value::Integer(user_id.as_i64())];

        if let Some(transaction_type) = self.transaction_type {
            where_clause_parts.push(format!("type = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(transaction_type.as_str().to_owned()));
        }

        if let Some(ref category) = self.category {
            where_clause_parts.push(format!("category = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(category.clone()));
        }

        if let Some(ref date_range) = self.date_range {
            where_clause_parts.push(format!(
                "date BETWEEN ?{} AND ?{}",
                query_parameters.len() + 1,
                query_parameters.len() + 2,
            ));
            query_parameters.push(Value::Text(date_range.start().to_string()));
            query_parameters.push(Value::Text(date_range.end().to_string()));
        }

        (
            String::from("WHERE ") + &where_clause_parts.join(" AND "),
            query_parameters,
        )
    }
}

/// Get the transactions of `user_id` that match `query`, in the order they were added.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn query_transactions(
    user_id: UserID,
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let (where_clause, query_parameters) = query.where_clause(user_id);
    let query_string = format!(
        "SELECT id, user_id, type, category, amount, date FROM \"transaction\" {where_clause} ORDER BY id ASC"
    );
    tracing::debug!("Querying transactions: {query_string}");

    connection
        .prepare(&query_string)?
        .query_map(params_from_iter(query_parameters.iter()), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Sum the amounts of the transactions of `user_id` that match `query`.
///
/// Returns `0.0` when no transactions match.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn sum_transactions(
    user_id: UserID,
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<f64, Error> {
    let (where_clause, query_parameters) = query.where_clause(user_id);
    let query_string = format!("SELECT SUM(amount) FROM \"transaction\" {where_clause}");
    tracing::debug!("Summing transactions: {query_string}");

    let total: Option<f64> = connection.query_row(
        &query_string,
        params_from_iter(query_parameters.iter()),
        |row| row.get(0),
    )?;

    Ok(total.unwrap_or(0.0))
}
