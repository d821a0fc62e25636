//! A personal finance ledger backed by SQLite.
//!
//! Users record income and expense transactions, set monthly spending limits
//! per category, and get income, expense and savings totals for a month, a
//! year or any date range. The [BudgetEvaluator] flags the categories where
//! spending went over the limit.
//!
//! Every operation is scoped to a [UserID], obtained by [registering](register_user)
//! and [logging in](log_in).

#![warn(missing_docs)]

mod app_state;
mod auth;
mod backup;
mod budget;
mod config;
mod database_id;
mod db;
mod dump;
mod error;
mod logging;
mod password;
mod report;
pub mod stores;
mod timezone;
mod transaction;
pub mod user;
mod validation;

pub use app_state::AppState;
pub use auth::{log_in, register_user};
pub use backup::{backup_database, restore_database};
pub use budget::{Budget, BudgetEvaluator, BudgetExceedance, BudgetStatus};
pub use config::Config;
pub use database_id::{BudgetId, DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use dump::{DataDump, dump_user_data};
pub use error::{Error, ValidationError};
pub use logging::setup_logging;
pub use password::{PasswordHash, ValidatedPassword};
pub use report::{Period, Report, Reporter};
pub use timezone::get_local_offset;
pub use transaction::{
    NewTransaction, Transaction, TransactionBuilder, TransactionQuery, TransactionType,
    TransactionUpdate,
};
pub use user::{User, UserID};
pub use validation::parse_date;
