use async_trait::async_trait;

use crate::errors::Result;
use crate::users::User;

use super::auth_model::{NewOtp, Otp, OtpPurpose};

/// Trait for one-time password repository operations
#[async_trait]
pub trait OtpRepositoryTrait: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<Option<Otp>>;

    /// Stores the code for an address, replacing any existing one.
    async fn upsert(&self, otp: NewOtp) -> Result<Otp>;
}

/// Trait for password hashing implementations
pub trait PasswordHasherTrait: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;

    fn verify(&self, password: &str, password_hash: &str) -> Result<bool>;
}

/// Trait for one-time password service operations
#[async_trait]
pub trait OtpServiceTrait: Send + Sync {
    /// Issues and mails a code from the signup screen. Signup requests
    /// are refused for addresses that already have an account.
    async fn request_otp(&self, email: &str, purpose: OtpPurpose) -> Result<()>;

    /// Issues and mails a code for the forgotten password flow.
    async fn request_password_reset(&self, email: &str) -> Result<()>;

    /// Checks a submitted code. Any failure reads as a mismatch.
    fn verify_otp(&self, email: &str, code: &str) -> bool;
}

/// Trait for credential checks
pub trait AuthServiceTrait: Send + Sync {
    /// Verifies an email and password pair, returning the matching user.
    fn authenticate(&self, email: &str, password: &str) -> Result<User>;
}
