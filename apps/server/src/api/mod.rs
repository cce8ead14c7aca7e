//! REST API surface: route assembly, shared wire shapes, and API docs.

use std::sync::Arc;

use axum::extract::Path;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::Config;
use crate::main_lib::AppState;

pub mod auth;
pub mod budgets;
pub mod categories;
pub mod expenses;
pub mod health;
pub mod notifications;
pub mod users;

/// Plain `{success, message}` acknowledgement used by mutation endpoints.
#[derive(Serialize, utoipa::ToSchema)]
pub(crate) struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct CountResponse {
    pub success: bool,
    pub count: i64,
}

/// Common `?page=&limit=` pair; services fall back to their defaults for
/// whatever is missing.
#[derive(Deserialize)]
pub(crate) struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    pub(crate) fn page(&self) -> i64 {
        self.page.unwrap_or(spendwise_core::constants::DEFAULT_PAGE)
    }

    pub(crate) fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(spendwise_core::constants::DEFAULT_PAGE_SIZE)
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "SpendWise API", description = "Personal expense tracking REST API"),
    paths(
        health::status,
        health::ready,
        categories::list_categories,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
    ),
    components(schemas(health::HealthcheckResponse, MessageResponse))
)]
struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn swagger_redirect() -> Redirect {
    Redirect::permanent("/docs/")
}

async fn swagger_index() -> Response {
    swagger_asset("index.html")
}

async fn serve_swagger(Path(tail): Path<String>) -> Response {
    swagger_asset(&tail)
}

/// Serves the bundled Swagger UI assets, with the initializer pointed at
/// our schema route.
fn swagger_asset(file: &str) -> Response {
    let config = Arc::new(utoipa_swagger_ui::Config::from("/openapi.json"));
    match utoipa_swagger_ui::serve(file, config) {
        Ok(Some(asset)) => (
            [(header::CONTENT_TYPE, asset.content_type)],
            asset.bytes.into_owned(),
        )
            .into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("Failed to serve Swagger UI asset {}: {}", file, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn cors_layer(allow_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allow_origins.iter().any(|origin| origin == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allow_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let public = Router::new()
        .merge(auth::public_router())
        .merge(users::public_router())
        .merge(health::router());

    let protected = Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(categories::router())
        .merge(budgets::router())
        .merge(expenses::router())
        .merge(notifications::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ));

    Router::new()
        .nest("/api/v1", public.merge(protected))
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(swagger_redirect))
        .route("/docs/", get(swagger_index))
        .route("/docs/{*tail}", get(serve_swagger))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(config.request_timeout))
                .layer(CompressionLayer::new())
                .layer(cors_layer(&config.cors_allow))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}
