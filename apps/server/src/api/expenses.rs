use std::sync::Arc;

use crate::api::{CountResponse, MessageResponse};
use crate::error::ApiResult;
use crate::main_lib::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use serde::Serialize;
use spendwise_core::auth::UserContext;
use spendwise_core::expenses::{
    Expense, ExpenseDateFilter, ExpenseInput, MonthlyReport, TodayReport,
};

#[derive(serde::Deserialize)]
struct ExpenseListQuery {
    page: Option<i64>,
    limit: Option<i64>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl ExpenseListQuery {
    fn filter(&self) -> ExpenseDateFilter {
        ExpenseDateFilter {
            from: self.from,
            to: self.to,
        }
    }
}

#[derive(Serialize)]
struct ExpenseListResponse {
    success: bool,
    expenses: Vec<Expense>,
}

async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
    Query(query): Query<ExpenseListQuery>,
) -> ApiResult<Json<ExpenseListResponse>> {
    let page = query.page.unwrap_or(spendwise_core::constants::DEFAULT_PAGE);
    let limit = query
        .limit
        .unwrap_or(spendwise_core::constants::DEFAULT_PAGE_SIZE);
    let expenses =
        state
            .expense_service
            .list_expenses(&ctx.user_id, query.filter(), page, limit)?;
    Ok(Json(ExpenseListResponse {
        success: true,
        expenses,
    }))
}

async fn count_expenses(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
    Query(query): Query<ExpenseListQuery>,
) -> ApiResult<Json<CountResponse>> {
    let page = query.page.unwrap_or(spendwise_core::constants::DEFAULT_PAGE);
    let limit = query
        .limit
        .unwrap_or(spendwise_core::constants::DEFAULT_PAGE_SIZE);
    let count =
        state
            .expense_service
            .count_expenses(&ctx.user_id, query.filter(), page, limit)?;
    Ok(Json(CountResponse {
        success: true,
        count,
    }))
}

async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
    Json(input): Json<ExpenseInput>,
) -> ApiResult<Json<MessageResponse>> {
    state.expense_service.create_expense(&ctx, input).await?;
    Ok(Json(MessageResponse::new("New Expense created!")))
}

async fn update_expense(
    Path(expense_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
    Json(input): Json<ExpenseInput>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .expense_service
        .update_expense(&ctx, &expense_id, input)
        .await?;
    Ok(Json(MessageResponse::new("Expense Updated successfully!")))
}

async fn delete_expense(
    Path(expense_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .expense_service
        .delete_expense(&ctx.user_id, &expense_id)
        .await?;
    Ok(Json(MessageResponse::new(format!(
        "{} Deleted successfully!",
        expense_id
    ))))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MonthlyReportResponse {
    success: bool,
    #[serde(flatten)]
    report: MonthlyReport,
}

async fn monthly_report(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
) -> ApiResult<Json<MonthlyReportResponse>> {
    let report = state.expense_service.monthly_report(&ctx.user_id)?;
    Ok(Json(MonthlyReportResponse {
        success: true,
        report,
    }))
}

#[derive(serde::Deserialize)]
struct TodayReportQuery {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TodayReportResponse {
    success: bool,
    #[serde(flatten)]
    report: TodayReport,
}

async fn today_report(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<UserContext>,
    Query(query): Query<TodayReportQuery>,
) -> ApiResult<Json<TodayReportResponse>> {
    let report = state
        .expense_service
        .today_report(&ctx.user_id, query.from, query.to)?;
    Ok(Json(TodayReportResponse {
        success: true,
        report,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/count", get(count_expenses))
        .route(
            "/expenses/{id}",
            put(update_expense).delete(delete_expense),
        )
        .route("/expenses/reports/monthly", get(monthly_report))
        .route("/expenses/reports/today", get(today_report))
}
