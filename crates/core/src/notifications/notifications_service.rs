use std::sync::Arc;

use async_trait::async_trait;
use log::error;

use crate::errors::Result;
use crate::utils::page_to_offset;

use super::notifications_model::{NewNotification, Notification};
use super::notifications_traits::{NotificationRepositoryTrait, NotificationServiceTrait};

/// Service for the in-app notification feed.
pub struct NotificationService {
    repository: Arc<dyn NotificationRepositoryTrait>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepositoryTrait>) -> Self {
        NotificationService { repository }
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    async fn notify(&self, notification: NewNotification) {
        if let Err(e) = self.repository.append(notification).await {
            error!("Failed to append notification: {}", e);
        }
    }

    fn list_notifications(&self, user_id: &str, page: i64, limit: i64) -> Result<Vec<Notification>> {
        let (offset, limit) = page_to_offset(page, limit);
        self.repository.list(user_id, offset, limit)
    }

    fn unread_count(&self, user_id: &str) -> Result<i64> {
        self.repository.count_unread(user_id)
    }

    async fn mark_all_read(&self, user_id: &str) -> Result<usize> {
        self.repository.mark_all_read(user_id).await
    }
}

/// Appends a notification on a detached task. Mutation endpoints record
/// their notifications this way so the write path never waits on the feed.
pub fn notify_detached(service: &Arc<dyn NotificationServiceTrait>, notification: NewNotification) {
    let service = Arc::clone(service);
    tokio::spawn(async move {
        service.notify(notification).await;
    });
}
