//! Defines the budget store trait.

use crate::{Budget, Error, user::UserID};

/// Sets and lists monthly category budgets.
pub trait BudgetStore {
    /// Set the limit for `category` in `month`/`year`, replacing any existing limit.
    fn set_budget(
        &mut self,
        user_id: UserID,
        category: &str,
        amount: f64,
        month: u8,
        year: i32,
    ) -> Result<Budget, Error>;

    /// List the budgets of `user_id` for `month`/`year`, empty if none are set.
    fn list_budgets(&self, user_id: UserID, month: u8, year: i32) -> Result<Vec<Budget>, Error>;
}
