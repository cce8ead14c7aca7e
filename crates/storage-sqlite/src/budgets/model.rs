//! Database model for budget rows.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use spendwise_core::budgets::Budget;

use crate::utils::parse_amount;

/// Database model for budget rows
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
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetDB {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub budget: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<BudgetDB> for Budget {
    fn from(db: BudgetDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            category: db.category,
            budget: parse_amount(&db.budget, "budget"),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
