use std::sync::Arc;

use crate::api::{MessageResponse, PageQuery};
use crate::error::ApiResult;
use crate::main_lib::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::{middleware, Extension, Json, Router};
use serde::Serialize;
use spendwise_core::auth::UserContext;
use spendwise_core::users::{
    AdminUpdateUser, RegisterUser, ResetPassword, UpdateUserProfile, User, UserProfile,
};
use tracing::debug;

async fn register(
    State(state): State<Arc<AppState>>,
    Json(registration): Json<RegisterUser>,
) -> ApiResult<Json<MessageResponse>> {
    let user = state.user_service.register(registration).await?;
    debug!("Registered user {}", user.email);
    Ok(Json(MessageResponse::new("Registration successful!")))
}

async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(reset): Json<ResetPassword>,
) -> ApiResult<Json<MessageResponse>> {
    state.user_service.reset_password(reset).await?;
    Ok(Json(MessageResponse::new("Password Updated!")))
}

#[derive(Serialize)]
struct ProfileResponse {
    success: bool,
    user: UserProfile,
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
) -> ApiResult<Json<ProfileResponse>> {
    let user = state.user_service.get_profile(&ctx.user_id)?;
    Ok(Json(ProfileResponse {
        success: true,
        user,
    }))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
    Json(update): Json<UpdateUserProfile>,
) -> ApiResult<Json<MessageResponse>> {
    state.user_service.update_profile(&ctx.user_id, update).await?;
    Ok(Json(MessageResponse::new("User Updated!")))
}

#[derive(Serialize)]
struct UserListResponse {
    success: bool,
    users: Vec<User>,
    count: i64,
}

/// Admin listing; `count` is the number of non-admin accounts.
async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<UserListResponse>> {
    let page = state.user_service.list_users(query.page(), query.limit())?;
    Ok(Json(UserListResponse {
        success: true,
        users: page.users,
        count: page.count,
    }))
}

async fn admin_update_user(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<AdminUpdateUser>,
) -> ApiResult<Json<MessageResponse>> {
    state.user_service.admin_update_user(&user_id, update).await?;
    Ok(Json(MessageResponse::new("User Updated!")))
}

async fn delete_user(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MessageResponse>> {
    state.user_service.delete_user(&user_id).await?;
    Ok(Json(MessageResponse::new("User Deleted!")))
}

pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/reset-password", patch(reset_password))
}

pub fn router() -> Router<Arc<AppState>> {
    let admin = Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", patch(admin_update_user).delete(delete_user))
        .layer(middleware::from_fn(crate::auth::require_admin));

    Router::new()
        .route("/users/me", get(get_profile).patch(update_profile))
        .merge(admin)
}
