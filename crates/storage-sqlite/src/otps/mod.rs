//! SQLite storage implementation for one-time passcodes.

mod model;
mod repository;

pub use model::OtpDB;
pub use repository::OtpRepository;
