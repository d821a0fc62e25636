//! Defines the ledger store trait.

use crate::{
    Error, Transaction, TransactionBuilder, TransactionQuery, TransactionUpdate,
    database_id::TransactionId, user::UserID,
};

/// Records, changes and reads the transactions of every user.
pub trait LedgerStore {
    /// Validate and add a new transaction, returning its ID.
    ///
    /// A missing date is filled in with today's date.
    fn add(&mut self, builder: TransactionBuilder) -> Result<TransactionId, Error>;

    /// Retrieve a transaction by its ID.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Change the fields set in `update`.
    ///
    /// Returns `false` if `id` does not exist or `update` is empty.
    fn update(&mut self, id: TransactionId, update: TransactionUpdate) -> Result<bool, Error>;

    /// Remove a transaction.
    ///
    /// Returns `false` if `id` does not exist.
    fn delete(&mut self, id: TransactionId) -> Result<bool, Error>;

    /// Retrieve the transactions of `user_id` that match `query`, in insertion order.
    fn query(&self, user_id: UserID, query: &TransactionQuery) -> Result<Vec<Transaction>, Error>;

    /// Sum the amounts of the transactions of `user_id` that match `query`.
    ///
    /// Implementers must return `0.0` rather than an error when nothing matches.
    fn sum_amount(&self, user_id: UserID, query: &TransactionQuery) -> Result<f64, Error>;
}
