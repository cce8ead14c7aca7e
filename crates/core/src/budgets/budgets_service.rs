use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use rust_decimal::Decimal;

use crate::categories::CategoryRepositoryTrait;
use crate::errors::{Error, Result, ValidationError};
use crate::expenses::ExpenseRepositoryTrait;
use crate::notifications::{
    notify_detached, NewNotification, NotificationKind, NotificationServiceTrait,
};
use crate::utils::{format_amount, month_bounds, page_to_offset};

use super::budgets_model::{
    AllocationResult, Budget, BudgetUpsert, CategoryBudgetOverview, CategoryBudgetPage,
};
use super::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};

/// Service for the main budget and per-category allocations.
pub struct BudgetService {
    budgets: Arc<dyn BudgetRepositoryTrait>,
    categories: Arc<dyn CategoryRepositoryTrait>,
    expenses: Arc<dyn ExpenseRepositoryTrait>,
    notifications: Arc<dyn NotificationServiceTrait>,
}

impl BudgetService {
    pub fn new(
        budgets: Arc<dyn BudgetRepositoryTrait>,
        categories: Arc<dyn CategoryRepositoryTrait>,
        expenses: Arc<dyn ExpenseRepositoryTrait>,
        notifications: Arc<dyn NotificationServiceTrait>,
    ) -> Self {
        BudgetService {
            budgets,
            categories,
            expenses,
            notifications,
        }
    }

    fn notify(&self, user_id: &str, message: String) {
        notify_detached(
            &self.notifications,
            NewNotification {
                user_id: user_id.to_string(),
                message,
                kind: NotificationKind::Info,
            },
        );
    }

    fn require_amount(amount: Decimal) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(ValidationError::InvalidInput("Invalid budget data".to_string()).into());
        }
        Ok(())
    }

    /// Sum of the user's allocations, the named category left out.
    fn allocated_elsewhere(&self, user_id: &str, category: &str) -> Result<Decimal> {
        let allocations = self.budgets.list_allocations(user_id)?;
        Ok(allocations
            .iter()
            .filter(|b| !b.category.eq_ignore_ascii_case(category))
            .map(|b| b.budget)
            .sum())
    }

    fn total_allocated(&self, user_id: &str) -> Result<Decimal> {
        let allocations = self.budgets.list_allocations(user_id)?;
        Ok(allocations.iter().map(|b| b.budget).sum())
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    fn get_main_budget(&self, user_id: &str) -> Result<Option<Budget>> {
        self.budgets.get_main(user_id)
    }

    async fn set_main_budget(&self, user_id: &str, amount: Decimal) -> Result<BudgetUpsert> {
        Self::require_amount(amount)?;

        let written = self
            .budgets
            .upsert(user_id, crate::constants::MAIN_BUDGET_CATEGORY, amount)
            .await?;
        debug!("Set main budget for {} to {}", user_id, amount);
        self.notify(
            user_id,
            format!(
                "Your total budget has been updated to Rs.{}!",
                format_amount(amount)
            ),
        );
        Ok(written)
    }

    async fn allocate_category_budget(
        &self,
        user_id: &str,
        category: &str,
        amount: Decimal,
    ) -> Result<AllocationResult> {
        Self::require_amount(amount)?;

        // Clamp the request so that the allocations together never pass
        // the main budget. Without a main budget there is no ceiling.
        let mut granted = amount;
        let elsewhere = self.allocated_elsewhere(user_id, category)?;
        if let Some(main) = self.budgets.get_main(user_id)? {
            if elsewhere + granted > main.budget {
                granted = main.budget - elsewhere;
            }
        }

        if self.categories.find_by_name(user_id, category)?.is_none() {
            return Err(Error::NotFound(
                "Category not found! Please create a new category first.".to_string(),
            ));
        }

        let written = self.budgets.upsert(user_id, category, granted).await?;
        let total_allocated_budget = self.total_allocated(user_id)?;
        self.notify(
            user_id,
            format!(
                "Budget of Rs.{} has been allocated to {}!",
                format_amount(granted),
                category
            ),
        );
        Ok(AllocationResult {
            budget: written.budget,
            created: written.created,
            total_allocated_budget,
        })
    }

    fn list_budgets(&self, user_id: &str, page: i64, limit: i64) -> Result<Vec<Budget>> {
        let (offset, limit) = page_to_offset(page, limit);
        self.budgets.list(user_id, offset, limit)
    }

    fn category_budget_overview(
        &self,
        user_id: &str,
        pagination: Option<(i64, i64)>,
    ) -> Result<CategoryBudgetPage> {
        let categories = match pagination {
            Some((page, limit)) => {
                let (offset, limit) = page_to_offset(page, limit);
                let all = self.categories.list_active(user_id)?;
                all.into_iter()
                    .skip(offset as usize)
                    .take(limit as usize)
                    .collect()
            }
            None => self.categories.list_active(user_id)?,
        };

        if categories.is_empty() {
            return Ok(CategoryBudgetPage {
                data: Vec::new(),
                total_allocated_budget: Decimal::ZERO,
            });
        }

        let (start, end) = month_bounds(Utc::now().date_naive());
        let totals = self.expenses.sum_by_category(user_id, start, end)?;
        let mut spent_by_name: HashMap<String, Decimal> = HashMap::new();
        for entry in &totals {
            *spent_by_name
                .entry(entry.category.to_lowercase())
                .or_insert(Decimal::ZERO) += entry.total;
        }

        let mut data = Vec::with_capacity(categories.len());
        for category in categories {
            let allocation = self.budgets.find_by_category(user_id, &category.name)?;
            let expense = spent_by_name
                .get(&category.name.to_lowercase())
                .copied()
                .unwrap_or(Decimal::ZERO);
            data.push(CategoryBudgetOverview {
                id: category.id,
                name: category.name,
                active: category.active,
                budget: allocation.as_ref().map(|b| b.budget).unwrap_or(Decimal::ZERO),
                expense,
                created_at: allocation.as_ref().map(|b| b.created_at),
                updated_at: allocation.as_ref().map(|b| b.updated_at),
            });
        }

        Ok(CategoryBudgetPage {
            data,
            total_allocated_budget: self.total_allocated(user_id)?,
        })
    }
}
