//! Token issuing, password hashing, and request guards.

use std::sync::Arc;

use anyhow::Context;
use argon2::password_hash::{PasswordHash, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHasher};
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use spendwise_core::auth::{PasswordHasherTrait, UserContext};
use spendwise_core::errors::{Error, Result};
use spendwise_core::users::User;

use crate::error::ApiError;
use crate::main_lib::AppState;

const TOKEN_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Claims embedded in an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies HS256 access tokens.
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthManager {
    /// Accepts the secret either base64-encoded or as raw text of at
    /// least 32 bytes.
    pub fn new(secret: &str) -> anyhow::Result<Self> {
        let key = decode_secret(secret)?;
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Ok(Self {
            encoding_key: EncodingKey::from_secret(&key),
            decoding_key: DecodingKey::from_secret(&key),
            validation,
        })
    }

    pub fn issue_token(&self, user: &User) -> anyhow::Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            iat: now,
            exp: now + TOKEN_TTL_SECONDS,
        };
        encode(&Header::default(), &claims, &self.encoding_key).context("Failed to sign token")
    }

    /// Decodes and validates a token, including its expiry.
    pub fn verify_token(&self, token: &str) -> Option<UserContext> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).ok()?;
        Some(UserContext {
            user_id: data.claims.sub,
            email: data.claims.email,
            role: data.claims.role,
        })
    }
}

fn decode_secret(secret: &str) -> anyhow::Result<Vec<u8>> {
    if let Ok(decoded) = STANDARD.decode(secret) {
        if decoded.len() >= 32 {
            return Ok(decoded);
        }
    }
    if secret.len() >= 32 {
        return Ok(secret.as_bytes().to_vec());
    }
    anyhow::bail!("JWT secret must be base64 or at least 32 characters long");
}

/// Argon2id password hashing behind the domain trait.
#[derive(Debug, Default, Clone)]
pub struct Argon2Hasher;

impl PasswordHasherTrait for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| Error::Unexpected(format!("Failed to hash password: {e}")))
    }

    fn verify(&self, password: &str, password_hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| Error::Unexpected(format!("Stored password hash is invalid: {e}")))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Missing or invalid Login Credentials".to_string())
}

/// Extracts the bearer token, verifies it, and stores the caller's
/// identity as a request extension.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> std::result::Result<Response, ApiError> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(unauthorized)?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(unauthorized());
    };
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(unauthorized());
    }

    let ctx = state
        .auth
        .verify_token(token.trim())
        .ok_or_else(unauthorized)?;
    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Rejects callers whose verified identity lacks the admin role. Must
/// run inside `require_auth`.
pub async fn require_admin(
    request: Request,
    next: Next,
) -> std::result::Result<Response, ApiError> {
    let is_admin = request
        .extensions()
        .get::<UserContext>()
        .is_some_and(UserContext::is_admin);
    if !is_admin {
        return Err(ApiError::Forbidden(
            "Unauthorized! You are not an admin.".to_string(),
        ));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user() -> User {
        User {
            id: "u1".to_string(),
            username: "jane".to_string(),
            email: "jane@example.com".to_string(),
            role: "user".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let manager = AuthManager::new("0123456789abcdef0123456789abcdef").unwrap();
        let token = manager.issue_token(&sample_user()).unwrap();

        let ctx = manager.verify_token(&token).unwrap();
        assert_eq!(ctx.user_id, "u1");
        assert_eq!(ctx.email, "jane@example.com");
        assert_eq!(ctx.role, "user");
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let manager = AuthManager::new("0123456789abcdef0123456789abcdef").unwrap();
        let other = AuthManager::new("fedcba9876543210fedcba9876543210").unwrap();
        let token = manager.issue_token(&sample_user()).unwrap();

        assert!(other.verify_token(&token).is_none());
        assert!(manager.verify_token("not-a-token").is_none());
    }

    #[test]
    fn test_short_secret_is_rejected() {
        assert!(AuthManager::new("short").is_err());
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("hunter2-is-secret").unwrap();

        assert!(hasher.verify("hunter2-is-secret", &hash).unwrap());
        assert!(!hasher.verify("wrong-password", &hash).unwrap());
    }
}
