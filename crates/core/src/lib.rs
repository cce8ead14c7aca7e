//! SpendWise Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for SpendWise.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod auth;
pub mod budgets;
pub mod categories;
pub mod constants;
pub mod errors;
pub mod expenses;
pub mod mail;
pub mod notifications;
pub mod reconciliation;
pub mod users;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
