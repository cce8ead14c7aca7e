//! SQLite storage implementation for SpendWise.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `spendwise-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! All other crates (`core`, `server`) are database-agnostic and work with traits.
//!
//! ```text
//! core (domain)          server (HTTP)
//!       │                      │
//!       └──────────┬───────────┘
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod budgets;
pub mod categories;
pub mod expenses;
pub mod notifications;
pub mod otps;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export the storage error type
pub use errors::StorageError;

// Re-export from spendwise-core for convenience
pub use spendwise_core::errors::{DatabaseError, Error, Result};
