//! Defines the crate level error type and the validation errors raised before writes.

use time::Date;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The caller supplied malformed input. Nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested resource was not found.
    ///
    /// Only single-row reads return this error. Updates and deletes that do
    /// not match a row report `false` instead.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The username and password did not match a registered user.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The username is already registered.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The configured timezone is not a canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Copying the database file to or from a backup failed.
    #[error("backup failed: {0}")]
    BackupError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// Input that was rejected before it reached the database.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ValidationError {
    /// Amounts record the size of a transaction or budget and cannot be negative.
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(f64),

    /// The amount was NaN or infinite.
    #[error("amount must be a finite number")]
    NonFiniteAmount,

    /// The category was empty or only whitespace.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// The transaction type was neither "income" nor "expense".
    #[error("\"{0}\" is not a transaction type, expected \"income\" or \"expense\"")]
    InvalidTransactionType(String),

    /// Months are numbered 1 to 12.
    #[error("{0} is not a month, expected a number from 1 to 12")]
    InvalidMonth(u8),

    /// The text could not be parsed as a `YYYY-MM-DD` calendar date, or the
    /// date is outside the supported range.
    #[error("invalid date \"{0}\", expected a calendar date formatted as YYYY-MM-DD")]
    InvalidDate(String),

    /// The start of a date range was after its end.
    #[error("the start date {start} is after the end date {end}")]
    InvalidDateRange {
        /// The first day of the range.
        start: Date,
        /// The last day of the range.
        end: Date,
    },

    /// The username was empty or only whitespace.
    #[error("username cannot be empty")]
    EmptyUsername,
}

#[cfg(test)]
mod tests {
    use crate::{Error, ValidationError};

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn other_sql_errors_are_kept() {
        let error: Error = rusqlite::Error::InvalidQuery.into();

        assert_eq!(error, Error::SqlError(rusqlite::Error::InvalidQuery));
    }

    #[test]
    fn validation_error_message_is_passed_through() {
        let error: Error = ValidationError::InvalidMonth(13).into();

        assert_eq!(
            error.to_string(),
            "13 is not a month, expected a number from 1 to 12"
        );
    }
}
