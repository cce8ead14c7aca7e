//! Database model for in-app notifications.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use spendwise_core::notifications::{NewNotification, Notification, NotificationKind};

/// Database model for in-app notifications
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
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NotificationDB {
    pub id: String,
    pub user_id: String,
    pub message: String,
    pub kind: String,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

impl From<NotificationDB> for Notification {
    fn from(db: NotificationDB) -> Self {
        let kind = db.kind.parse::<NotificationKind>().unwrap_or_else(|e| {
            log::error!("{}. Falling back to info.", e);
            NotificationKind::Info
        });
        Self {
            id: db.id,
            user_id: db.user_id,
            message: db.message,
            kind,
            read: db.read,
            created_at: db.created_at,
        }
    }
}

impl From<NewNotification> for NotificationDB {
    fn from(domain: NewNotification) -> Self {
        Self {
            id: String::new(),
            user_id: domain.user_id,
            message: domain.message,
            kind: domain.kind.as_str().to_string(),
            read: false,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
