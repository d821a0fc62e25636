//! The ledger's transaction model and the SQL that reads and writes it.

mod core;
mod query;
mod update;

pub use core::{
    NewTransaction, Transaction, TransactionBuilder, TransactionType, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, map_transaction_row,
};
pub use query::{TransactionQuery, query_transactions, sum_transactions};
pub use update::{TransactionUpdate, update_transaction};
