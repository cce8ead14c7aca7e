//! Authentication domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::ROLE_ADMIN;

/// A one-time password issued to an email address.
///
/// Each address holds at most one live code; issuing again replaces it.
/// Codes are not consumed by verification, they lapse on expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Otp {
    pub id: String,
    pub email: String,
    pub code: String,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for issuing a code.
#[derive(Debug, Clone)]
pub struct NewOtp {
    pub email: String,
    pub code: String,
    pub expires_at: NaiveDateTime,
}

/// What a one-time password is being issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OtpPurpose {
    Signup,
    PasswordChange,
}

/// Login credentials as submitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Identity extracted from a verified access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub user_id: String,
    pub email: String,
    pub role: String,
}

impl UserContext {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}
