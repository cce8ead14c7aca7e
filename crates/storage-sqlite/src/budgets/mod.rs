//! SQLite storage implementation for budget rows.

mod model;
mod repository;

pub use model::BudgetDB;
pub use repository::BudgetRepository;
