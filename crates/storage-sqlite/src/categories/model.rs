//! Database model for spending categories.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use spendwise_core::categories::{Category, NewCategory};

/// Database model for spending categories
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
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CategoryDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<CategoryDB> for Category {
    fn from(db: CategoryDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            active: db.active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl CategoryDB {
    /// Builds a fresh row for the given owner; the id is assigned by the
    /// repository on insert.
    pub fn from_new(user_id: &str, domain: NewCategory) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: String::new(),
            user_id: user_id.to_string(),
            name: domain.name,
            active: domain.active,
            created_at: now,
            updated_at: now,
        }
    }
}
