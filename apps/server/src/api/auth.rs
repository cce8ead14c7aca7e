use std::sync::Arc;

use crate::api::MessageResponse;
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Serialize;
use spendwise_core::auth::{Credentials, OtpPurpose, UserContext};
use spendwise_core::constants::ROLE_ADMIN;
use spendwise_core::users::UserProfile;
use tracing::debug;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    success: bool,
    user: UserProfile,
    message: String,
    access_token: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .auth_service
        .authenticate(&credentials.email, &credentials.password)?;
    let access_token = state.auth.issue_token(&user)?;
    debug!("Issued access token for {}", user.email);
    Ok(Json(LoginResponse {
        success: true,
        user: UserProfile {
            email: user.email,
            username: user.username,
        },
        message: "Login successful".to_string(),
        access_token,
    }))
}

/// Request body carrying the address an OTP should be mailed to.
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailRequest {
    email: Option<String>,
}

#[derive(serde::Deserialize)]
struct OtpQuery {
    /// What the code is for; anything but "signup" means a password change.
    #[serde(rename = "for")]
    purpose: Option<String>,
}

async fn request_otp(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OtpQuery>,
    Json(body): Json<EmailRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let email = body.email.unwrap_or_default();
    if email.is_empty() {
        return Err(ApiError::BadRequest("Email is required!".to_string()));
    }
    let purpose = match query.purpose.as_deref() {
        Some("signup") => OtpPurpose::Signup,
        _ => OtpPurpose::PasswordChange,
    };
    state.otp_service.request_otp(&email, purpose).await?;
    Ok(Json(MessageResponse::new("Otp sent successfully!")))
}

async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<EmailRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let email = body.email.unwrap_or_default();
    if email.is_empty() {
        return Err(ApiError::BadRequest("Email is required!".to_string()));
    }
    state.otp_service.request_password_reset(&email).await?;
    Ok(Json(MessageResponse::new("Otp sent successfully!")))
}

async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("Logout successful"))
}

#[derive(serde::Deserialize)]
struct StatusQuery {
    role: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    is_logged_in: bool,
    message: String,
}

/// Session probe; with `?role=admin` it also checks for the admin role.
async fn session_status(
    Extension(ctx): Extension<UserContext>,
    Query(query): Query<StatusQuery>,
) -> (StatusCode, Json<StatusResponse>) {
    if query.role.as_deref() == Some(ROLE_ADMIN) && !ctx.is_admin() {
        return (
            StatusCode::FORBIDDEN,
            Json(StatusResponse {
                is_logged_in: false,
                message: "Unauthorized! You are not an admin.".to_string(),
            }),
        );
    }
    (
        StatusCode::OK,
        Json(StatusResponse {
            is_logged_in: true,
            message: "User is logged in".to_string(),
        }),
    )
}

pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/otp", post(request_otp))
        .route("/auth/forgot-password", post(forgot_password))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/status", get(session_status))
}
