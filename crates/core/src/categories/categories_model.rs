//! Category domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain model for a spending category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "category")]
    pub name: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    #[serde(rename = "category")]
    pub name: String,
    pub active: bool,
}

/// Input model for renaming a category or changing its active flag.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[serde(rename = "category")]
    pub name: String,
    pub active: bool,
}

/// Trimmed category row for the expense entry picker.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOption {
    pub id: String,
    #[serde(rename = "category")]
    pub name: String,
    pub active: bool,
}

/// A category row with its share of the month's spending.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithShare {
    pub id: String,
    #[serde(rename = "category")]
    pub name: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub percentage_expense: i64,
}
