use std::sync::Arc;

use crate::api::{MessageResponse, PageQuery};
use crate::error::ApiResult;
use crate::main_lib::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::{get, patch};
use axum::{Extension, Json, Router};
use rust_decimal::Decimal;
use serde::Serialize;
use spendwise_core::auth::UserContext;
use spendwise_core::budgets::{Budget, BudgetAmount, CategoryBudgetPage};

#[derive(Serialize)]
struct BudgetListResponse {
    success: bool,
    budgets: Vec<Budget>,
}

async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<BudgetListResponse>> {
    let budgets = state
        .budget_service
        .list_budgets(&ctx.user_id, query.page(), query.limit())?;
    Ok(Json(BudgetListResponse {
        success: true,
        budgets,
    }))
}

#[derive(Serialize)]
struct MainBudgetResponse {
    success: bool,
    budget: Option<Budget>,
}

async fn get_main_budget(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
) -> ApiResult<Json<MainBudgetResponse>> {
    let budget = state.budget_service.get_main_budget(&ctx.user_id)?;
    Ok(Json(MainBudgetResponse {
        success: true,
        budget,
    }))
}

fn upsert_message(created: bool) -> &'static str {
    if created {
        "Insert successfully!"
    } else {
        "Updated successfully!"
    }
}

async fn set_main_budget(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
    Json(amount): Json<BudgetAmount>,
) -> ApiResult<Json<MessageResponse>> {
    let written = state
        .budget_service
        .set_main_budget(&ctx.user_id, amount.budget)
        .await?;
    Ok(Json(MessageResponse::new(upsert_message(written.created))))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AllocationResponse {
    success: bool,
    message: String,
    total_allocated_budget: Decimal,
}

async fn allocate_category_budget(
    Path(category): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
    Json(amount): Json<BudgetAmount>,
) -> ApiResult<Json<AllocationResponse>> {
    let written = state
        .budget_service
        .allocate_category_budget(&ctx.user_id, &category, amount.budget)
        .await?;
    Ok(Json(AllocationResponse {
        success: true,
        message: upsert_message(written.created).to_string(),
        total_allocated_budget: written.total_allocated_budget,
    }))
}

#[derive(serde::Deserialize)]
struct OverviewQuery {
    page: Option<i64>,
    limit: Option<i64>,
    /// `reports` wants every active category; `home` pages through them.
    #[serde(rename = "for")]
    scope: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OverviewResponse {
    success: bool,
    #[serde(flatten)]
    page: CategoryBudgetPage,
}

async fn category_budget_overview(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
    Query(query): Query<OverviewQuery>,
) -> ApiResult<Json<OverviewResponse>> {
    let pagination = if query.scope.as_deref() == Some("reports") {
        None
    } else {
        Some((
            query
                .page
                .unwrap_or(spendwise_core::constants::DEFAULT_PAGE),
            query
                .limit
                .unwrap_or(spendwise_core::constants::DEFAULT_PAGE_SIZE),
        ))
    };
    let page = state
        .budget_service
        .category_budget_overview(&ctx.user_id, pagination)?;
    Ok(Json(OverviewResponse {
        success: true,
        page,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/budgets", get(list_budgets))
        .route(
            "/budgets/main",
            get(get_main_budget).patch(set_main_budget),
        )
        .route("/budgets/categories", get(category_budget_overview))
        .route("/budgets/{category}", patch(allocate_category_budget))
}
