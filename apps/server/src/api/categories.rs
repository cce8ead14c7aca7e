use std::sync::Arc;

use crate::api::{CountResponse, MessageResponse};
use crate::error::ApiResult;
use crate::main_lib::AppState;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Extension, Json, Router};
use serde::Serialize;
use spendwise_core::auth::UserContext;
use spendwise_core::categories::{
    Category, CategoryOption, CategoryUpdate, CategoryWithShare, NewCategory,
};

#[derive(serde::Deserialize)]
struct CategoryListQuery {
    page: Option<i64>,
    limit: Option<i64>,
    /// `expense` narrows the listing to active rows for the entry picker.
    #[serde(rename = "for")]
    scope: Option<String>,
}

#[derive(Serialize)]
struct CategoryListResponse {
    success: bool,
    categories: Vec<CategoryWithShare>,
}

#[derive(Serialize)]
struct CategoryOptionsResponse {
    success: bool,
    categories: Vec<CategoryOption>,
}

#[utoipa::path(get, path = "/api/v1/categories", responses((status = 200, description = "Category listing")))]
pub(crate) async fn list_categories(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
    Query(query): Query<CategoryListQuery>,
) -> ApiResult<Response> {
    if query.scope.as_deref() == Some("expense") {
        let categories = state.category_service.list_active_options(&ctx.user_id)?;
        return Ok(Json(CategoryOptionsResponse {
            success: true,
            categories,
        })
        .into_response());
    }

    let page = query.page.unwrap_or(spendwise_core::constants::DEFAULT_PAGE);
    let limit = query
        .limit
        .unwrap_or(spendwise_core::constants::DEFAULT_PAGE_SIZE);
    let categories = state
        .category_service
        .list_categories(&ctx.user_id, page, limit)?;
    Ok(Json(CategoryListResponse {
        success: true,
        categories,
    })
    .into_response())
}

#[derive(serde::Deserialize)]
struct CategoryCountQuery {
    /// `budget` counts only active categories.
    #[serde(rename = "for")]
    scope: Option<String>,
}

async fn count_categories(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
    Query(query): Query<CategoryCountQuery>,
) -> ApiResult<Json<CountResponse>> {
    let active_only = query.scope.as_deref() == Some("budget");
    let count = state
        .category_service
        .count_categories(&ctx.user_id, active_only)?;
    Ok(Json(CountResponse {
        success: true,
        count,
    }))
}

#[utoipa::path(post, path = "/api/v1/categories", responses((status = 200, body = MessageResponse)))]
pub(crate) async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
    Json(new_category): Json<NewCategory>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .category_service
        .create_category(&ctx.user_id, new_category)
        .await?;
    Ok(Json(MessageResponse::new("New Category created!")))
}

#[derive(Serialize)]
struct CategoryResponse {
    success: bool,
    category: Category,
}

async fn get_category(
    Path(category_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
) -> ApiResult<Json<CategoryResponse>> {
    let category = state
        .category_service
        .get_category(&ctx.user_id, &category_id)?;
    Ok(Json(CategoryResponse {
        success: true,
        category,
    }))
}

/// Request body for renaming a category. An absent `active` keeps the
/// stored flag.
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCategoryRequest {
    category: String,
    active: Option<bool>,
}

#[utoipa::path(put, path = "/api/v1/categories/{id}", responses((status = 200, body = MessageResponse)))]
pub(crate) async fn update_category(
    Path(category_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
    Json(body): Json<UpdateCategoryRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let current = state
        .category_service
        .get_category(&ctx.user_id, &category_id)?;
    let update = CategoryUpdate {
        name: body.category,
        active: body.active.unwrap_or(current.active),
    };
    state
        .category_service
        .update_category(&ctx.user_id, &category_id, update)
        .await?;
    Ok(Json(MessageResponse::new("Category Updated successfully!")))
}

#[derive(serde::Deserialize)]
struct SetActiveRequest {
    active: bool,
}

async fn set_category_active(
    Path(category_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
    Json(body): Json<SetActiveRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .category_service
        .set_category_active(&ctx.user_id, &category_id, body.active)
        .await?;
    Ok(Json(MessageResponse::new("Updated category active status")))
}

#[utoipa::path(delete, path = "/api/v1/categories/{id}", responses((status = 200, body = MessageResponse)))]
pub(crate) async fn delete_category(
    Path(category_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .category_service
        .delete_category(&ctx.user_id, &category_id)
        .await?;
    Ok(Json(MessageResponse::new("Category Deleted successfully!")))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/count", get(count_categories))
        .route(
            "/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/categories/{id}/active", patch(set_category_active))
}
