use std::sync::Arc;

use crate::api::{CountResponse, MessageResponse, PageQuery};
use crate::error::ApiResult;
use crate::main_lib::AppState;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Serialize;
use spendwise_core::auth::UserContext;
use spendwise_core::notifications::Notification;

#[derive(Serialize)]
struct NotificationListResponse {
    success: bool,
    notifications: Vec<Notification>,
}

async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<NotificationListResponse>> {
    let notifications =
        state
            .notification_service
            .list_notifications(&ctx.user_id, query.page(), query.limit())?;
    Ok(Json(NotificationListResponse {
        success: true,
        notifications,
    }))
}

async fn unread_count(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
) -> ApiResult<Json<CountResponse>> {
    let count = state.notification_service.unread_count(&ctx.user_id)?;
    Ok(Json(CountResponse {
        success: true,
        count,
    }))
}

async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
) -> ApiResult<Json<MessageResponse>> {
    state.notification_service.mark_all_read(&ctx.user_id).await?;
    Ok(Json(MessageResponse::new("Notifications marked as read!")))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/count", get(unread_count))
        .route("/notifications/mark-read", post(mark_all_read))
}
