//! SQLite storage implementation for expense entries.

mod model;
mod repository;

pub use model::ExpenseDB;
pub use repository::ExpenseRepository;
