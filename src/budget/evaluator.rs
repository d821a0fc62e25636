//! Compares monthly spending against the budgets a user has set.

use serde::Serialize;

use crate::{
    Error, TransactionType,
    report::{Period, Reporter},
    stores::{BudgetStore, LedgerStore},
    user::UserID,
};

/// A budgeted category whose spending went over its limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetExceedance {
    /// The budgeted category.
    pub category: String,
    /// The limit that was set for the month.
    pub budget_amount: f64,
    /// The sum of the category's expenses in the month.
    pub total_spent: f64,
    /// `total_spent - budget_amount`, always positive.
    pub over_budget: f64,
}

/// The outcome of checking a month's spending against its budgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "exceeded", rename_all = "snake_case")]
pub enum BudgetStatus {
    /// No budgets are set for the month, so nothing was checked.
    NoBudgets,
    /// Every budgeted category is at or under its limit.
    WithinBudget,
    /// At least one budgeted category went over its limit.
    Exceeded(Vec<BudgetExceedance>),
}

/// Checks expenses from a ledger store against limits from a budget store.
#[derive(Debug, Clone)]
pub struct BudgetEvaluator<L, B> {
    reporter: Reporter<L>,
    budgets: B,
}

impl<L: LedgerStore, B: BudgetStore> BudgetEvaluator<L, B> {
    /// Create an evaluator that reads transactions from `ledger` and limits from `budgets`.
    pub fn new(ledger: L, budgets: B) -> Self {
        Self {
            reporter: Reporter::new(ledger),
            budgets,
        }
    }

    /// Find the categories where spending in `month`/`year` went over budget.
    ///
    /// Only categories with a budget are checked, in the order the budget
    /// store lists them. Spending exactly equal to the limit is not an
    /// exceedance. An empty result means either that nothing went over or that
    /// no budgets are set, use [BudgetEvaluator::budget_status] to tell the two apart.
    ///
    /// # Errors
    /// Returns [Error::Validation] if `month` is not 1 to 12, or any error from the stores.
    pub fn check_exceedance(
        &self,
        user_id: UserID,
        month: u8,
        year: i32,
    ) -> Result<Vec<BudgetExceedance>, Error> {
        let budgets = self.budgets.list_budgets(user_id, month, year)?;
        let period = Period::Month { month, year };
        let mut exceedances = Vec::new();

        for budget in budgets {
            let total_spent = self.reporter.category_sum(
                user_id,
                TransactionType::Expense,
                &budget.category,
                period,
            )?;

            if total_spent > budget.amount {
                let over_budget = total_spent - budget.amount;
                tracing::warn!(
                    "Budget exceeded for {}: spent {total_spent} of {} ({over_budget} over)",
                    budget.category,
                    budget.amount
                );

                exceedances.push(BudgetExceedance {
                    category: budget.category,
                    budget_amount: budget.amount,
                    total_spent,
                    over_budget,
                });
            }
        }

        if exceedances.is_empty() {
            tracing::info!("User {user_id} is within budget for {month}/{year}");
        }

        Ok(exceedances)
    }

    /// Like [BudgetEvaluator::check_exceedance], but reports when there was nothing to check.
    ///
    /// # Errors
    /// Returns [Error::Validation] if `month` is not 1 to 12, or any error from the stores.
    pub fn budget_status(&self, user_id: UserID, month: u8, year: i32) -> Result<BudgetStatus, Error> {
        if self.budgets.list_budgets(user_id, month, year)?.is_empty() {
            tracing::info!("User {user_id} has no budgets for {month}/{year}");
            return Ok(BudgetStatus::NoBudgets);
        }

        let exceedances = self.check_exceedance(user_id, month, year)?;

        if exceedances.is_empty() {
            Ok(BudgetStatus::WithinBudget)
        } else {
            Ok(BudgetStatus::Exceeded(exceedances))
        }
    }
}
