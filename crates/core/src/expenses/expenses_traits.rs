use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::auth::UserContext;
use crate::errors::Result;

use super::expenses_model::{
    CategoryTotal, DailyExpense, Expense, ExpenseDateFilter, ExpenseInput, MonthlyReport,
    TodayReport,
};

/// Trait for expense repository operations
///
/// All date ranges are half open, `start <= created_at < end`.
#[async_trait]
pub trait ExpenseRepositoryTrait: Send + Sync {
    fn find_by_id(&self, user_id: &str, expense_id: &str) -> Result<Option<Expense>>;

    /// Lists entries newest first, optionally bounded by a range.
    fn search(
        &self,
        user_id: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Expense>>;

    fn count(
        &self,
        user_id: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<i64>;

    /// Case-insensitive sum for one category over the range.
    fn sum_for_category(
        &self,
        user_id: &str,
        category: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Decimal>;

    /// Per-category sums over the range, keyed by the stored spelling.
    fn sum_by_category(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CategoryTotal>>;

    /// Per-day sums over the range.
    fn sum_by_day(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<DailyExpense>>;

    async fn create(&self, user_id: &str, input: ExpenseInput) -> Result<Expense>;

    /// Replaces the category, description, and amount of an entry.
    async fn update(&self, user_id: &str, expense_id: &str, input: ExpenseInput)
        -> Result<Expense>;

    /// Removes an entry, returning the removed row.
    async fn delete(&self, user_id: &str, expense_id: &str) -> Result<Expense>;
}

/// Trait for expense service operations
#[async_trait]
pub trait ExpenseServiceTrait: Send + Sync {
    /// Records an expense and reconciles the category's budget standing.
    async fn create_expense(&self, ctx: &UserContext, input: ExpenseInput) -> Result<Expense>;

    /// Replaces an entry and reconciles against the submitted category.
    async fn update_expense(
        &self,
        ctx: &UserContext,
        expense_id: &str,
        input: ExpenseInput,
    ) -> Result<Expense>;

    async fn delete_expense(&self, user_id: &str, expense_id: &str) -> Result<Expense>;

    fn list_expenses(
        &self,
        user_id: &str,
        filter: ExpenseDateFilter,
        page: i64,
        limit: i64,
    ) -> Result<Vec<Expense>>;

    /// Filtered total minus the rows the pagination has already walked
    /// past, matching what the listing still has left to show.
    fn count_expenses(
        &self,
        user_id: &str,
        filter: ExpenseDateFilter,
        page: i64,
        limit: i64,
    ) -> Result<i64>;

    /// Current-month per-day totals with the primary budget standing.
    fn monthly_report(&self, user_id: &str) -> Result<MonthlyReport>;

    /// Per-category spending for the chosen day window next to
    /// yesterday's, across the user's active categories.
    fn today_report(
        &self,
        user_id: &str,
        from: Option<chrono::NaiveDate>,
        to: Option<chrono::NaiveDate>,
    ) -> Result<TodayReport>;
}
