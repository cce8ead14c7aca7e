//! Database model for one-time passcodes.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use spendwise_core::auth::{NewOtp, Otp};

/// Database model for one-time passcodes
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
#[diesel(table_name = crate::schema::otps)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OtpDB {
    pub id: String,
    pub email: String,
    pub code: String,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<OtpDB> for Otp {
    fn from(db: OtpDB) -> Self {
        Self {
            id: db.id,
            email: db.email,
            code: db.code,
            expires_at: db.expires_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewOtp> for OtpDB {
    fn from(domain: NewOtp) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: String::new(),
            email: domain.email,
            code: domain.code,
            expires_at: domain.expires_at,
            created_at: now,
            updated_at: now,
        }
    }
}
