//! Budget domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Domain model for a budget row.
///
/// The overall budget is the row whose category is `main`; every other
/// row is a per-category allocation carved out of it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    #[serde(skip_serializing)]
    pub user_id: String,
    pub category: String,
    pub budget: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Requested amount for a budget upsert.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAmount {
    pub budget: Decimal,
}

/// Outcome of a budget upsert.
#[derive(Debug, Clone)]
pub struct BudgetUpsert {
    pub budget: Budget,
    pub created: bool,
}

/// Outcome of a category allocation, amount already clamped.
#[derive(Debug, Clone)]
pub struct AllocationResult {
    pub budget: Budget,
    pub created: bool,
    pub total_allocated_budget: Decimal,
}

/// An active category joined with its allocation and month spending.
///
/// The timestamps come from the budget row and stay null until one
/// exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBudgetOverview {
    pub id: String,
    #[serde(rename = "category")]
    pub name: String,
    pub active: bool,
    pub budget: Decimal,
    pub expense: Decimal,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Overview rows plus the total allocated across categories.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBudgetPage {
    pub data: Vec<CategoryBudgetOverview>,
    pub total_allocated_budget: Decimal,
}
