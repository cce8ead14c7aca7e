//! SQLite storage implementation for user accounts.

mod model;
mod repository;

pub use model::{UserDB, UserUpdateDB};
pub use repository::UserRepository;
