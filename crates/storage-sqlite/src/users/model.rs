//! Database model for user accounts.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use spendwise_core::users::{NewUser, User, UserUpdate};

/// Database model for user accounts
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
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial column update; absent fields keep their stored values.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct UserUpdateDB {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            username: db.username,
            email: db.email,
            role: db.role,
            password_hash: db.password_hash,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewUser> for UserDB {
    fn from(domain: NewUser) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: String::new(),
            username: domain.username,
            email: domain.email,
            password_hash: domain.password_hash,
            role: domain.role,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<UserUpdate> for UserUpdateDB {
    fn from(domain: UserUpdate) -> Self {
        Self {
            username: domain.username,
            email: domain.email,
            password_hash: domain.password_hash,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
