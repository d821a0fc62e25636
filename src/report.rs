//! Income, expense and savings totals over calendar periods.
//!
//! All sums are computed by the ledger store, so a period without any
//! matching transactions totals `0.0` rather than being absent.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    Error, TransactionQuery, TransactionType, ValidationError, stores::LedgerStore, user::UserID,
    validation::validate_month,
};

/// The time window a total is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// A calendar month, `month` is 1 = January.
    Month {
        /// The month number.
        month: u8,
        /// The calendar year.
        year: i32,
    },
    /// A calendar year.
    Year(i32),
    /// The days from `start` to `end`, inclusive.
    Range {
        /// The first day of the period.
        start: Date,
        /// The last day of the period.
        end: Date,
    },
}

impl Period {
    /// The first and last day of the period.
    ///
    /// # Errors
    /// Returns a:
    /// - [ValidationError::InvalidMonth] if a month is not 1 to 12,
    /// - [ValidationError::InvalidDateRange] if `start` is after `end`,
    /// - or [ValidationError::InvalidDate] if the year is outside the supported range.
    pub fn date_range(&self) -> Result<RangeInclusive<Date>, ValidationError> {
        match *self {
            Period::Month { month, year } => {
                let month = validate_month(month)?;
                let start = calendar_date(year, month, 1)?;
                let end = calendar_date(year, month, month.length(year))?;

                Ok(start..=end)
            }
            Period::Year(year) => {
                let start = calendar_date(year, Month::January, 1)?;
                let end = calendar_date(year, Month::December, 31)?;

                Ok(start..=end)
            }
            Period::Range { start, end } => {
                if start > end {
                    return Err(ValidationError::InvalidDateRange { start, end });
                }

                Ok(start..=end)
            }
        }
    }
}

fn calendar_date(year: i32, month: Month, day: u8) -> Result<Date, ValidationError> {
    Date::from_calendar_date(year, month, day).map_err(|_| {
        ValidationError::InvalidDate(format!("{year}-{:02}-{day:02}", month as u8))
    })
}

/// Total income, total expenses and their difference for a period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expenses: f64,
    /// `total_income - total_expenses`, negative when the user spent more than they earned.
    pub savings: f64,
}

impl Report {
    /// Create a report, computing the savings from the two totals.
    pub fn new(total_income: f64, total_expenses: f64) -> Self {
        Self {
            total_income,
            total_expenses,
            savings: total_income - total_expenses,
        }
    }
}

/// Computes totals over the transactions in a ledger store.
#[derive(Debug, Clone)]
pub struct Reporter<L> {
    ledger: L,
}

impl<L: LedgerStore> Reporter<L> {
    /// Create a reporter that reads from `ledger`.
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Sum the transactions of one type for `user_id` in `period`.
    ///
    /// Returns `0.0` if no transactions match.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the period is invalid, or any error from the ledger store.
    pub fn sum_amount(
        &self,
        user_id: UserID,
        transaction_type: TransactionType,
        period: Period,
    ) -> Result<f64, Error> {
        let query = TransactionQuery::default()
            .transaction_type(transaction_type)
            .date_range(period.date_range()?);

        self.ledger.sum_amount(user_id, &query)
    }

    /// Like [Reporter::sum_amount], restricted to one category.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the period is invalid, or any error from the ledger store.
    pub fn category_sum(
        &self,
        user_id: UserID,
        transaction_type: TransactionType,
        category: &str,
        period: Period,
    ) -> Result<f64, Error> {
        let query = TransactionQuery::default()
            .transaction_type(transaction_type)
            .category(category)
            .date_range(period.date_range()?);

        self.ledger.sum_amount(user_id, &query)
    }

    /// Totals for the calendar month `month`/`year`.
    ///
    /// # Errors
    /// Returns [Error::Validation] if `month` is not 1 to 12, or any error from the ledger store.
    pub fn monthly_report(&self, user_id: UserID, month: u8, year: i32) -> Result<Report, Error> {
        let report = self.report(user_id, Period::Month { month, year })?;
        tracing::debug!("Monthly report for user {user_id} in {month}/{year}: {report:?}");

        Ok(report)
    }

    /// Totals for the calendar year `year`.
    ///
    /// # Errors
    /// Returns any error from the ledger store.
    pub fn yearly_report(&self, user_id: UserID, year: i32) -> Result<Report, Error> {
        let report = self.report(user_id, Period::Year(year))?;
        tracing::debug!("Yearly report for user {user_id} in {year}: {report:?}");

        Ok(report)
    }

    /// Totals for the days from `start` to `end`, inclusive.
    ///
    /// # Errors
    /// Returns [Error::Validation] if `start` is after `end`, or any error from the ledger store.
    pub fn period_totals(&self, user_id: UserID, start: Date, end: Date) -> Result<Report, Error> {
        self.report(user_id, Period::Range { start, end })
    }

    fn report(&self, user_id: UserID, period: Period) -> Result<Report, Error> {
        let total_income = self.sum_amount(user_id, TransactionType::Income, period)?;
        let total_expenses = self.sum_amount(user_id, TransactionType::Expense, period)?;

        Ok(Report::new(total_income, total_expenses))
    }
}
