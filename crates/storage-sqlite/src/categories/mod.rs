//! SQLite storage implementation for spending categories.

mod model;
mod repository;

pub use model::CategoryDB;
pub use repository::CategoryRepository;
