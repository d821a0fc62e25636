//! Monthly category budgets and the checks that compare them against spending.

mod core;
mod evaluator;

pub use core::{
    Budget, create_budget_table, get_budgets_for_month, get_budgets_for_user, upsert_budget,
};
pub use evaluator::{BudgetEvaluator, BudgetExceedance, BudgetStatus};
