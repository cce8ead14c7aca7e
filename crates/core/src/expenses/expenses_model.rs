//! Expense domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Domain model for an expense entry.
///
/// The owning user id never leaves the API; list payloads omit it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    #[serde(skip_serializing)]
    pub user_id: String,
    pub category: String,
    pub description: String,
    pub expense: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating or replacing an expense entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInput {
    pub category: String,
    pub description: String,
    pub expense: Decimal,
}

/// Whole-day date range filter for listings. Both ends are inclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpenseDateFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// One day's spending total inside the monthly report.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyExpense {
    pub date: NaiveDate,
    pub total: Decimal,
}

/// Current-month spending report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub per_day_expenses: Vec<DailyExpense>,
    pub monthly_expense: Decimal,
    pub primary_budget: Decimal,
    pub percentage_expense: Decimal,
}

/// Spending for one category inside the today report.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryExpense {
    pub category: String,
    pub expense: Decimal,
}

/// Category spending for a chosen window next to yesterday's.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayReport {
    pub expenses_today: Vec<CategoryExpense>,
    pub expenses_yesterday: Vec<CategoryExpense>,
}

/// Sum for one stored category spelling, as grouped by the store.
#[derive(Debug, Clone)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}
