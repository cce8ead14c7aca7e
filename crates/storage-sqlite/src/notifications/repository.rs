use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use spendwise_core::notifications::{
    NewNotification, Notification, NotificationRepositoryTrait,
};
use spendwise_core::Result;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::notifications::model::NotificationDB;
use crate::schema::notifications;

/// SQLite repository for in-app notifications.
pub struct NotificationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl NotificationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl NotificationRepositoryTrait for NotificationRepository {
    fn list(&self, user_id: &str, offset: i64, limit: i64) -> Result<Vec<Notification>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .order(notifications::created_at.desc())
            .offset(offset)
            .limit(limit)
            .load::<NotificationDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Notification::from).collect())
    }

    fn count_unread(&self, user_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let count = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .filter(notifications::read.eq(false))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count)
    }

    async fn append(&self, notification: NewNotification) -> Result<Notification> {
        let mut record = NotificationDB::from(notification);
        record.id = Uuid::new_v4().to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Notification> {
                diesel::insert_into(notifications::table)
                    .values(&record)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let inserted = notifications::table
                    .find(&record.id)
                    .first::<NotificationDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Notification::from(inserted))
            })
            .await
    }

    async fn mark_all_read(&self, user_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::update(
                    notifications::table.filter(notifications::user_id.eq(&user_id)),
                )
                .set(notifications::read.eq(true))
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}
