use std::sync::Arc;

use crate::auth::{Argon2Hasher, AuthManager};
use crate::config::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use spendwise_core::auth::{
    AuthService, AuthServiceTrait, OtpService, OtpServiceTrait, PasswordHasherTrait,
};
use spendwise_core::budgets::{BudgetService, BudgetServiceTrait};
use spendwise_core::categories::{CategoryService, CategoryServiceTrait};
use spendwise_core::expenses::{ExpenseService, ExpenseServiceTrait};
use spendwise_core::mail::{HttpRelayMailer, MailerTrait, NoopMailer};
use spendwise_core::notifications::{NotificationService, NotificationServiceTrait};
use spendwise_core::reconciliation::{BudgetReconciliationService, ReconciliationServiceTrait};
use spendwise_core::users::{UserService, UserServiceTrait};
use spendwise_storage_sqlite::{
    budgets::BudgetRepository, categories::CategoryRepository, db, expenses::ExpenseRepository,
    notifications::NotificationRepository, otps::OtpRepository, users::UserRepository, DbPool,
};

pub struct AppState {
    pub auth: Arc<AuthManager>,
    pub auth_service: Arc<dyn AuthServiceTrait + Send + Sync>,
    pub otp_service: Arc<dyn OtpServiceTrait + Send + Sync>,
    pub user_service: Arc<dyn UserServiceTrait + Send + Sync>,
    pub category_service: Arc<dyn CategoryServiceTrait + Send + Sync>,
    pub budget_service: Arc<dyn BudgetServiceTrait + Send + Sync>,
    pub expense_service: Arc<dyn ExpenseServiceTrait + Send + Sync>,
    pub notification_service: Arc<dyn NotificationServiceTrait + Send + Sync>,
    /// Kept for the readiness probe's connection checkout.
    pub pool: Arc<DbPool>,
}

pub fn init_tracing() {
    let log_format = std::env::var("SW_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let jwt_secret = config
        .jwt_secret
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("SW_JWT_SECRET is not set"))?;
    let auth = Arc::new(AuthManager::new(jwt_secret)?);

    db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let pool = db::create_pool(&config.db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let otp_repository = Arc::new(OtpRepository::new(pool.clone(), writer.clone()));
    let category_repository = Arc::new(CategoryRepository::new(pool.clone(), writer.clone()));
    let budget_repository = Arc::new(BudgetRepository::new(pool.clone(), writer.clone()));
    let expense_repository = Arc::new(ExpenseRepository::new(pool.clone(), writer.clone()));
    let notification_repository =
        Arc::new(NotificationRepository::new(pool.clone(), writer.clone()));

    let mailer: Arc<dyn MailerTrait> = match (&config.mail_relay_url, &config.mail_from) {
        (Some(relay_url), Some(from)) => Arc::new(HttpRelayMailer::new(
            relay_url.clone(),
            from.clone(),
            config.mail_api_key.clone(),
        )),
        _ => {
            tracing::warn!("Mail relay not configured, outbound mail is dropped");
            Arc::new(NoopMailer)
        }
    };

    let hasher: Arc<dyn PasswordHasherTrait> = Arc::new(Argon2Hasher);

    let notification_service: Arc<dyn NotificationServiceTrait + Send + Sync> =
        Arc::new(NotificationService::new(notification_repository.clone()));

    let auth_service: Arc<dyn AuthServiceTrait + Send + Sync> = Arc::new(AuthService::new(
        user_repository.clone(),
        hasher.clone(),
    ));

    let otp_service: Arc<dyn OtpServiceTrait + Send + Sync> = Arc::new(OtpService::new(
        otp_repository.clone(),
        user_repository.clone(),
        mailer.clone(),
    ));

    let user_service: Arc<dyn UserServiceTrait + Send + Sync> = Arc::new(UserService::new(
        user_repository.clone(),
        otp_service.clone(),
        hasher.clone(),
    ));

    let reconciliation_service: Arc<dyn ReconciliationServiceTrait + Send + Sync> =
        Arc::new(BudgetReconciliationService::new(
            expense_repository.clone(),
            budget_repository.clone(),
            notification_service.clone(),
            mailer.clone(),
        ));

    let category_service: Arc<dyn CategoryServiceTrait + Send + Sync> =
        Arc::new(CategoryService::new(
            category_repository.clone(),
            expense_repository.clone(),
            notification_service.clone(),
        ));

    let budget_service: Arc<dyn BudgetServiceTrait + Send + Sync> = Arc::new(BudgetService::new(
        budget_repository.clone(),
        category_repository.clone(),
        expense_repository.clone(),
        notification_service.clone(),
    ));

    let expense_service: Arc<dyn ExpenseServiceTrait + Send + Sync> = Arc::new(ExpenseService::new(
        expense_repository.clone(),
        category_repository.clone(),
        budget_repository.clone(),
        notification_service.clone(),
        reconciliation_service,
    ));

    Ok(Arc::new(AppState {
        auth,
        auth_service,
        otp_service,
        user_service,
        category_service,
        budget_service,
        expense_service,
        notification_service,
        pool,
    }))
}
