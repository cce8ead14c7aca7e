//! Notifications module - in-app notification feed models, services, and traits.

mod notifications_model;
mod notifications_service;
mod notifications_traits;

pub use notifications_model::{NewNotification, Notification, NotificationKind};
pub use notifications_service::{notify_detached, NotificationService};
pub use notifications_traits::{NotificationRepositoryTrait, NotificationServiceTrait};
