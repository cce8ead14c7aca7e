//! SpendWise HTTP server: REST API, auth guards, and state wiring.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod main_lib;

pub use main_lib::{build_state, init_tracing, AppState};
