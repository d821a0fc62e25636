//! Partial updates of ledger transactions.

use rusqlite::{Connection, params};
use time::Date;

use crate::{
    Error, ValidationError,
    database_id::TransactionId,
    validation::{validate_amount, validate_category},
};

use super::TransactionType;

/// The fields to change on an existing transaction.
///
/// Fields left as `None` keep their stored value.
///
/// # Examples
///
/// ```
/// use finance_ledger::TransactionUpdate;
///
/// let update = TransactionUpdate::default().amount(75.0);
/// assert!(!update.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionUpdate {
    /// The new transaction type.
    pub transaction_type: Option<TransactionType>,
    /// The new category label.
    pub category: Option<String>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new date.
    pub date: Option<Date>,
}

impl TransactionUpdate {
    /// Change the transaction type.
    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    /// Change the category.
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_owned());
        self
    }

    /// Change the amount.
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Change the date.
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Whether the update would leave the transaction unchanged.
    pub fn is_empty(&self) -> bool {
        self.transaction_type.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.date.is_none()
    }

    fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            transaction_type: self.transaction_type,
            category: self.category.as_deref().map(validate_category).transpose()?,
            amount: self.amount.map(validate_amount).transpose()?,
            date: self.date,
        })
    }
}

type RowsAffected = usize;

/// Apply the fields set in `update` to the transaction with `id`.
///
/// Every supplied field is validated before the statement runs, so a rejected
/// update changes nothing. Returns the number of rows changed, zero if `id`
/// did not match. An empty update does not touch the database.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if a supplied field is invalid,
/// - or [Error::SqlError] if there is an SQL error.
pub fn update_transaction(
    id: TransactionId,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    if update.is_empty() {
        return Ok(0);
    }

    let update = update.validate()?;

    connection
        .execute(
            "UPDATE \"transaction\"
        SET \
            type = COALESCE(?1, type), \
            category = COALESCE(?2, category), \
            amount = COALESCE(?3, amount), \
            date = COALESCE(?4, date) \
        WHERE id = ?5;",
            params![
                update.transaction_type,
                update.category,
                update.amount,
                update.date,
                id,
            ],
        )
        .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, Transaction, TransactionType, TransactionUpdate, ValidationError,
        db::initialize,
        transaction::{create_transaction, get_transaction, update_transaction},
        user::UserID,
    };

    fn get_test_connection_with_transaction() -> (Connection, Transaction) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let new_transaction =
            Transaction::build(UserID::new(1), TransactionType::Expense, "Food", 50.0)
                .date(date!(2024 - 05 - 01))
                .finalise(date!(2024 - 05 - 20))
                .unwrap();
        let transaction = create_transaction(new_transaction, &conn).unwrap();

        (conn, transaction)
    }

    #[test]
    fn updates_only_amount() {
        let (conn, transaction) = get_test_connection_with_transaction();

        let rows_affected =
            update_transaction(transaction.id, TransactionUpdate::default().amount(75.0), &conn)
                .unwrap();

        assert_eq!(rows_affected, 1);
        let got = get_transaction(transaction.id, &conn).unwrap();
        assert_eq!(
            got,
            Transaction {
                amount: 75.0,
                ..transaction
            }
        );
    }

    #[test]
    fn updates_all_fields() {
        let (conn, transaction) = get_test_connection_with_transaction();
        let update = TransactionUpdate::default()
            .transaction_type(TransactionType::Income)
            .category("Refund")
            .amount(12.0)
            .date(date!(2024 - 06 - 02));

        update_transaction(transaction.id, update, &conn).unwrap();

        let got = get_transaction(transaction.id, &conn).unwrap();
        assert_eq!(
            got,
            Transaction {
                id: transaction.id,
                user_id: transaction.user_id,
                transaction_type: TransactionType::Income,
                category: "Refund".to_owned(),
                amount: 12.0,
                date: date!(2024 - 06 - 02),
            }
        );
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let (conn, transaction) = get_test_connection_with_transaction();

        let rows_affected =
            update_transaction(transaction.id, TransactionUpdate::default(), &conn).unwrap();

        assert_eq!(rows_affected, 0);
        assert_eq!(get_transaction(transaction.id, &conn).unwrap(), transaction);
    }

    #[test]
    fn missing_id_affects_no_rows() {
        let (conn, _) = get_test_connection_with_transaction();

        let rows_affected =
            update_transaction(9999, TransactionUpdate::default().amount(1.0), &conn).unwrap();

        assert_eq!(rows_affected, 0);
    }

    #[test]
    fn invalid_field_rejects_whole_update() {
        let (conn, transaction) = get_test_connection_with_transaction();
        let update = TransactionUpdate::default()
            .category("Groceries")
            .amount(-3.0);

        let result = update_transaction(transaction.id, update, &conn);

        assert_eq!(
            result,
            Err(Error::Validation(ValidationError::NegativeAmount(-3.0)))
        );
        assert_eq!(get_transaction(transaction.id, &conn).unwrap(), transaction);
    }

    #[test]
    fn blank_category_is_rejected() {
        let (conn, transaction) = get_test_connection_with_transaction();

        let result =
            update_transaction(transaction.id, TransactionUpdate::default().category(""), &conn);

        assert_eq!(result, Err(Error::Validation(ValidationError::EmptyCategory)));
    }
}
