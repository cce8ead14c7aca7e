//! Database model for expense entries.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use spendwise_core::expenses::{Expense, ExpenseInput};

use crate::utils::parse_amount;

/// Database model for expense entries
///
/// Amounts are stored as decimal text to keep exact values through the
/// round trip.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExpenseDB {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub description: String,
    pub expense: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ExpenseDB> for Expense {
    fn from(db: ExpenseDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            category: db.category,
            description: db.description,
            expense: parse_amount(&db.expense, "expense"),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl ExpenseDB {
    /// Builds a fresh row for the given owner; the id is assigned by the
    /// repository on insert.
    pub fn from_input(user_id: &str, input: ExpenseInput) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: String::new(),
            user_id: user_id.to_string(),
            category: input.category,
            description: input.description,
            expense: input.expense.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
