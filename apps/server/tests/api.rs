use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use chrono::Utc;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use spendwise_core::auth::{NewOtp, OtpRepositoryTrait, PasswordHasherTrait};
use spendwise_core::users::{NewUser, UserRepositoryTrait};
use spendwise_server::auth::Argon2Hasher;
use spendwise_server::{api::app_router, build_state, config::Config, AppState};
use spendwise_storage_sqlite::{db, otps::OtpRepository, users::UserRepository};

fn test_config(db_path: String) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path,
        jwt_secret: Some("0123456789abcdef0123456789abcdef".to_string()),
        cors_allow: vec!["*".to_string()],
        request_timeout: std::time::Duration::from_millis(30_000),
        static_dir: "dist".to_string(),
        mail_relay_url: None,
        mail_from: None,
        mail_api_key: None,
    }
}

async fn build_test_app() -> (axum::Router, Arc<AppState>, TempDir) {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("test.db").to_string_lossy().to_string();
    let config = test_config(db_path);
    let state = build_state(&config).await.unwrap();
    let router = app_router(state.clone(), &config);
    (router, state, tmp)
}

/// Plants a known one-time password so registration can complete without
/// a mail relay.
async fn seed_otp(state: &Arc<AppState>, email: &str, code: &str) {
    let writer = db::spawn_writer((*state.pool).clone());
    let otps = OtpRepository::new(state.pool.clone(), writer);
    otps.upsert(NewOtp {
        email: email.to_string(),
        code: code.to_string(),
        expires_at: Utc::now().naive_utc() + chrono::Duration::seconds(300),
    })
    .await
    .unwrap();
}

/// Plants an account row directly, bypassing the OTP dance.
async fn seed_user(state: &Arc<AppState>, username: &str, email: &str, password: &str, role: &str) {
    let writer = db::spawn_writer((*state.pool).clone());
    let users = UserRepository::new(state.pool.clone(), writer);
    let password_hash = Argon2Hasher.hash(password).unwrap();
    users
        .create(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            password_hash,
        })
        .await
        .unwrap();
}

async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn login(app: &axum::Router, email: &str, password: &str) -> String {
    let (status, json) = send(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Login successful");
    json["accessToken"].as_str().unwrap().to_string()
}

#[tokio::test(flavor = "multi_thread")]
async fn register_login_and_track_expenses() {
    let (app, state, _tmp) = build_test_app().await;
    seed_otp(&state, "jane@example.com", "123456").await;

    // Register with the planted code
    let (status, json) = send(
        &app,
        Method::POST,
        "/api/v1/users/register",
        None,
        Some(serde_json::json!({
            "username": "jane",
            "email": "jane@example.com",
            "password": "hunter2-secret",
            "otp": "123456"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Registration successful!");

    let token = login(&app, "jane@example.com", "hunter2-secret").await;

    // Session probe
    let (status, json) = send(&app, Method::GET, "/api/v1/auth/status", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["isLoggedIn"], true);

    // Create a category and see it listed with a zero share
    let (status, json) = send(
        &app,
        Method::POST,
        "/api/v1/categories",
        Some(&token),
        Some(serde_json::json!({ "category": "Food", "active": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "New Category created!");

    let (status, json) = send(&app, Method::GET, "/api/v1/categories", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["categories"][0]["category"], "Food");
    assert_eq!(json["categories"][0]["percentageExpense"], 0);

    // Duplicate names conflict
    let (status, json) = send(
        &app,
        Method::POST,
        "/api/v1/categories",
        Some(&token),
        Some(serde_json::json!({ "category": "food", "active": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["message"], "The category food already exists!");

    // Set the overall budget
    let (status, json) = send(
        &app,
        Method::PATCH,
        "/api/v1/budgets/main",
        Some(&token),
        Some(serde_json::json!({ "budget": 4000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Insert successfully!");

    // Record an expense against the category, case-insensitively
    let (status, json) = send(
        &app,
        Method::POST,
        "/api/v1/expenses",
        Some(&token),
        Some(serde_json::json!({
            "category": "food",
            "description": "Groceries",
            "expense": 100.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "New Expense created!");

    let (status, json) = send(&app, Method::GET, "/api/v1/expenses", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["expenses"][0]["description"], "Groceries");
    assert_eq!(json["expenses"][0]["expense"], 100.0);

    // Monthly report reflects the spending share of the main budget
    let (status, json) = send(
        &app,
        Method::GET,
        "/api/v1/expenses/reports/monthly",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["monthlyExpense"], 100.0);
    assert_eq!(json["primaryBudget"], 4000.0);
    assert_eq!(json["percentageExpense"], 2.5);

    // The activity above left notifications behind
    let (status, json) = send(
        &app,
        Method::GET,
        "/api/v1/notifications/count",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["count"].as_i64().unwrap() > 0);

    let (status, json) = send(
        &app,
        Method::POST,
        "/api/v1/notifications/mark-read",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Notifications marked as read!");

    let (_, json) = send(
        &app,
        Method::GET,
        "/api/v1/notifications/count",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(json["count"], 0);
}

#[tokio::test]
async fn category_allocations_are_clamped_to_the_main_budget() {
    let (app, state, _tmp) = build_test_app().await;
    seed_user(&state, "jane", "jane@example.com", "hunter2-secret", "user").await;
    let token = login(&app, "jane@example.com", "hunter2-secret").await;

    for name in ["Food", "Clothes"] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/categories",
            Some(&token),
            Some(serde_json::json!({ "category": name, "active": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/v1/budgets/main",
        Some(&token),
        Some(serde_json::json!({ "budget": 10000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(
        &app,
        Method::PATCH,
        "/api/v1/budgets/Food",
        Some(&token),
        Some(serde_json::json!({ "budget": 8000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Insert successfully!");
    assert_eq!(json["totalAllocatedBudget"], 8000.0);

    // Only 2000 of the main budget is left, so the request is cut down
    let (status, json) = send(
        &app,
        Method::PATCH,
        "/api/v1/budgets/Clothes",
        Some(&token),
        Some(serde_json::json!({ "budget": 6000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalAllocatedBudget"], 10000.0);

    let (status, json) = send(
        &app,
        Method::GET,
        "/api/v1/budgets/categories",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let clothes = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["category"] == "Clothes")
        .unwrap();
    assert_eq!(clothes["budget"], 2000.0);

    // Allocating against a category that was never created is refused
    let (status, json) = send(
        &app,
        Method::PATCH,
        "/api/v1/budgets/Ghost",
        Some(&token),
        Some(serde_json::json!({ "budget": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        json["error"]["message"],
        "Category not found! Please create a new category first."
    );
}

#[tokio::test]
async fn unauthenticated_requests_are_rejected() {
    let (app, _state, _tmp) = build_test_app().await;

    let (status, json) = send(&app, Method::GET, "/api/v1/expenses", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        json["error"]["message"],
        "Missing or invalid Login Credentials"
    );

    let (status, json) = send(
        &app,
        Method::GET,
        "/api/v1/expenses",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        json["error"]["message"],
        "Missing or invalid Login Credentials"
    );

    // Health stays open
    let (status, json) = send(&app, Method::GET, "/api/v1/health/status", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let (app, state, _tmp) = build_test_app().await;
    seed_user(&state, "alice", "alice@example.com", "correct-horse", "user").await;

    let (status, json) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(serde_json::json!({
            "email": "alice@example.com",
            "password": "battery-staple"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["message"], "Invalid email or password");

    // Same answer for an address that was never registered
    let (status, json) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(serde_json::json!({
            "email": "nobody@example.com",
            "password": "battery-staple"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["message"], "Invalid email or password");
}

#[tokio::test]
async fn admin_routes_require_admin_role() {
    let (app, state, _tmp) = build_test_app().await;
    seed_user(&state, "alice", "alice@example.com", "correct-horse", "user").await;
    seed_user(&state, "root", "root@example.com", "admin-password", "admin").await;

    let user_token = login(&app, "alice@example.com", "correct-horse").await;
    let admin_token = login(&app, "root@example.com", "admin-password").await;

    // A regular account is turned away
    let (status, json) = send(&app, Method::GET, "/api/v1/users", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"]["message"], "Unauthorized! You are not an admin.");

    let (status, json) = send(
        &app,
        Method::GET,
        "/api/v1/auth/status?role=admin",
        Some(&user_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["isLoggedIn"], false);

    // The admin sees every account, counting only the non-admin ones
    let (status, json) = send(&app, Method::GET, "/api/v1/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["users"].as_array().unwrap().len(), 2);
    assert_eq!(json["count"], 1);

    let admin_row = json["users"]
        .as_array()
        .unwrap()
        .iter()
        .find(|user| user["username"] == "root")
        .unwrap();
    assert!(admin_row.get("passwordHash").is_none());
}
