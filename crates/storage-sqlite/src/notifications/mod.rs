//! SQLite storage implementation for in-app notifications.

mod model;
mod repository;

pub use model::NotificationDB;
pub use repository::NotificationRepository;
