use async_trait::async_trait;

use crate::errors::Result;

use super::notifications_model::{NewNotification, Notification};

/// Trait for notification repository operations
#[async_trait]
pub trait NotificationRepositoryTrait: Send + Sync {
    /// Lists a user's notifications, newest first.
    fn list(&self, user_id: &str, offset: i64, limit: i64) -> Result<Vec<Notification>>;

    /// Counts the user's unread notifications.
    fn count_unread(&self, user_id: &str) -> Result<i64>;

    async fn append(&self, notification: NewNotification) -> Result<Notification>;

    /// Marks every notification of the user as read, returning the number
    /// of rows touched.
    async fn mark_all_read(&self, user_id: &str) -> Result<usize>;
}

/// Trait for notification service operations
#[async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    /// Appends a notification. Failures are logged and swallowed so that
    /// a broken notification feed never fails the triggering operation.
    async fn notify(&self, notification: NewNotification);

    fn list_notifications(&self, user_id: &str, page: i64, limit: i64) -> Result<Vec<Notification>>;

    fn unread_count(&self, user_id: &str) -> Result<i64>;

    async fn mark_all_read(&self, user_id: &str) -> Result<usize>;
}
