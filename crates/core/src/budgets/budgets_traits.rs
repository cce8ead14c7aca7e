use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;

use super::budgets_model::{
    AllocationResult, Budget, BudgetUpsert, CategoryBudgetPage,
};

/// Trait for budget repository operations
#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    /// The user's `main` row, when one exists.
    fn get_main(&self, user_id: &str) -> Result<Option<Budget>>;

    /// Case-insensitive category match within the user's budgets.
    fn find_by_category(&self, user_id: &str, category: &str) -> Result<Option<Budget>>;

    fn list(&self, user_id: &str, offset: i64, limit: i64) -> Result<Vec<Budget>>;

    /// Every allocation row, the `main` row left out.
    fn list_allocations(&self, user_id: &str) -> Result<Vec<Budget>>;

    /// Writes the amount for a category, inserting the row when no
    /// case-insensitive match exists yet.
    async fn upsert(&self, user_id: &str, category: &str, amount: Decimal)
        -> Result<BudgetUpsert>;
}

/// Trait for budget service operations
#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    fn get_main_budget(&self, user_id: &str) -> Result<Option<Budget>>;

    async fn set_main_budget(&self, user_id: &str, amount: Decimal) -> Result<BudgetUpsert>;

    /// Allocates part of the main budget to a category. The amount is
    /// clamped so that allocations never exceed the main budget.
    async fn allocate_category_budget(
        &self,
        user_id: &str,
        category: &str,
        amount: Decimal,
    ) -> Result<AllocationResult>;

    fn list_budgets(&self, user_id: &str, page: i64, limit: i64) -> Result<Vec<Budget>>;

    /// Active categories joined with their allocations and month
    /// spending. `pagination` of `None` returns the whole set.
    fn category_budget_overview(
        &self,
        user_id: &str,
        pagination: Option<(i64, i64)>,
    ) -> Result<CategoryBudgetPage>;
}
