//! Auth module - credentials, one-time passwords, and identity types.

mod auth_model;
mod auth_service;
mod auth_traits;
mod otp_service;

pub use auth_model::{Credentials, NewOtp, Otp, OtpPurpose, UserContext};
pub use auth_service::AuthService;
pub use auth_traits::{
    AuthServiceTrait, OtpRepositoryTrait, OtpServiceTrait, PasswordHasherTrait,
};
pub use otp_service::OtpService;
