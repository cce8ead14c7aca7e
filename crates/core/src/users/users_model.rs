//! User account domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain model for an account.
///
/// The stored hash never serializes into API payloads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Registration payload, already paired with the emailed code.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub otp: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Storage draft for a new account row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub role: String,
    pub password_hash: String,
}

/// Partial column update for an account row.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// Self-service profile update payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserProfile {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Fields an administrator may change on any account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Payload for completing a password reset with an emailed code.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPassword {
    pub email: String,
    pub password: String,
    pub otp: String,
}

/// The signed-in user's own view of their account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    pub username: String,
}

/// One page of accounts plus the non-admin total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersPage {
    pub users: Vec<User>,
    pub count: i64,
}
