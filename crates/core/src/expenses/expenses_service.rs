use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use crate::auth::UserContext;
use crate::budgets::BudgetRepositoryTrait;
use crate::categories::{Category, CategoryRepositoryTrait};
use crate::errors::{Error, Result, ValidationError};
use crate::notifications::{
    notify_detached, NewNotification, NotificationKind, NotificationServiceTrait,
};
use crate::reconciliation::{ExpenseChange, ReconciliationServiceTrait};
use crate::utils::{
    day_bounds, day_start, format_amount, month_bounds, month_start, page_to_offset,
    yesterday_bounds,
};

use super::expenses_model::{
    CategoryExpense, Expense, ExpenseDateFilter, ExpenseInput, MonthlyReport, TodayReport,
};
use super::expenses_traits::{ExpenseRepositoryTrait, ExpenseServiceTrait};

/// Service for recording expenses and reporting on spending.
pub struct ExpenseService {
    expenses: Arc<dyn ExpenseRepositoryTrait>,
    categories: Arc<dyn CategoryRepositoryTrait>,
    budgets: Arc<dyn BudgetRepositoryTrait>,
    notifications: Arc<dyn NotificationServiceTrait>,
    reconciliation: Arc<dyn ReconciliationServiceTrait>,
}

impl ExpenseService {
    pub fn new(
        expenses: Arc<dyn ExpenseRepositoryTrait>,
        categories: Arc<dyn CategoryRepositoryTrait>,
        budgets: Arc<dyn BudgetRepositoryTrait>,
        notifications: Arc<dyn NotificationServiceTrait>,
        reconciliation: Arc<dyn ReconciliationServiceTrait>,
    ) -> Self {
        ExpenseService {
            expenses,
            categories,
            budgets,
            notifications,
            reconciliation,
        }
    }

    fn validate_input(input: &ExpenseInput) -> Result<()> {
        if input.category.trim().is_empty() || input.description.trim().is_empty() {
            return Err(ValidationError::InvalidInput("Invalid expense data".to_string()).into());
        }
        Ok(())
    }

    /// Inclusive whole-day filter turned into half-open timestamps.
    fn filter_bounds(filter: ExpenseDateFilter) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
        (
            filter.from.map(day_start),
            filter.to.map(|to| day_bounds(to).1),
        )
    }

    /// Sums per active category over a window, matching stored category
    /// spellings case-insensitively and filling absent ones with zero.
    fn window_totals(
        &self,
        user_id: &str,
        categories: &[Category],
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<CategoryExpense>> {
        let mut totals: HashMap<String, Decimal> = HashMap::new();
        for entry in self.expenses.sum_by_category(user_id, start, end)? {
            *totals.entry(entry.category.to_lowercase()).or_default() += entry.total;
        }
        Ok(categories
            .iter()
            .map(|category| CategoryExpense {
                category: category.name.clone(),
                expense: totals
                    .get(&category.name.to_lowercase())
                    .copied()
                    .unwrap_or(Decimal::ZERO),
            })
            .collect())
    }
}

#[async_trait]
impl ExpenseServiceTrait for ExpenseService {
    async fn create_expense(&self, ctx: &UserContext, input: ExpenseInput) -> Result<Expense> {
        Self::validate_input(&input)?;
        if self
            .categories
            .find_by_name(&ctx.user_id, &input.category)?
            .is_none()
        {
            return Err(Error::NotFound(
                "Category not found! Please create a new category first.".to_string(),
            ));
        }

        let category = input.category.clone();
        let amount = input.expense;
        let expense = self.expenses.create(&ctx.user_id, input).await?;
        self.reconciliation
            .reconcile(ctx, &category, ExpenseChange::Created { amount })
            .await?;
        Ok(expense)
    }

    async fn update_expense(
        &self,
        ctx: &UserContext,
        expense_id: &str,
        input: ExpenseInput,
    ) -> Result<Expense> {
        Self::validate_input(&input)?;
        let previous = self
            .expenses
            .find_by_id(&ctx.user_id, expense_id)?
            .ok_or_else(|| Error::NotFound("Expense failed to update!".to_string()))?;

        // The submitted category is taken as-is here, unlike create.
        let category = input.category.clone();
        let amount = input.expense;
        let updated = self.expenses.update(&ctx.user_id, expense_id, input).await?;
        self.reconciliation
            .reconcile(
                ctx,
                &category,
                ExpenseChange::Updated {
                    previous: previous.expense,
                    amount,
                },
            )
            .await?;
        Ok(updated)
    }

    async fn delete_expense(&self, user_id: &str, expense_id: &str) -> Result<Expense> {
        if self.expenses.find_by_id(user_id, expense_id)?.is_none() {
            return Err(Error::NotFound(format!("{expense_id} Not Found!")));
        }
        let removed = self.expenses.delete(user_id, expense_id).await?;
        notify_detached(
            &self.notifications,
            NewNotification {
                user_id: user_id.to_string(),
                message: format!(
                    "An expense entry {} of Rs.{} has been deleted for {}!",
                    removed.description,
                    format_amount(removed.expense),
                    removed.category
                ),
                kind: NotificationKind::Info,
            },
        );
        Ok(removed)
    }

    fn list_expenses(
        &self,
        user_id: &str,
        filter: ExpenseDateFilter,
        page: i64,
        limit: i64,
    ) -> Result<Vec<Expense>> {
        let (offset, limit) = page_to_offset(page, limit);
        let (start, end) = Self::filter_bounds(filter);
        self.expenses.search(user_id, start, end, offset, limit)
    }

    fn count_expenses(
        &self,
        user_id: &str,
        filter: ExpenseDateFilter,
        page: i64,
        limit: i64,
    ) -> Result<i64> {
        let (offset, _) = page_to_offset(page, limit);
        let (start, end) = Self::filter_bounds(filter);
        Ok(self.expenses.count(user_id, start, end)? - offset)
    }

    fn monthly_report(&self, user_id: &str) -> Result<MonthlyReport> {
        let (start, end) = month_bounds(Utc::now().date_naive());
        let mut per_day = self.expenses.sum_by_day(user_id, start, end)?;
        per_day.sort_by(|a, b| b.date.cmp(&a.date));

        let monthly: Decimal = per_day.iter().map(|day| day.total).sum();
        let primary = self
            .budgets
            .get_main(user_id)?
            .map(|main| main.budget)
            .unwrap_or(Decimal::ZERO);
        let percentage = if primary.is_zero() {
            Decimal::ZERO
        } else {
            monthly / primary * Decimal::ONE_HUNDRED
        };

        Ok(MonthlyReport {
            per_day_expenses: per_day,
            monthly_expense: monthly,
            primary_budget: primary,
            percentage_expense: percentage,
        })
    }

    fn today_report(
        &self,
        user_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<TodayReport> {
        let today = Utc::now().date_naive();
        let (start, end) = match (from, to) {
            (Some(from), Some(to)) => (day_start(from), day_bounds(to).1),
            (Some(from), None) => (day_start(from), day_bounds(today).1),
            (None, Some(to)) => (month_start(today), day_bounds(to).1),
            (None, None) => day_bounds(today),
        };

        let categories = self.categories.list_active(user_id)?;
        let expenses_today = self.window_totals(user_id, &categories, start, end)?;
        let (y_start, y_end) = yesterday_bounds(today);
        let expenses_yesterday = self.window_totals(user_id, &categories, y_start, y_end)?;

        Ok(TodayReport {
            expenses_today,
            expenses_yesterday,
        })
    }
}
