//! Environment-driven server configuration.

use std::{net::SocketAddr, time::Duration};

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    /// HS256 signing secret, base64 or at least 32 ASCII characters.
    pub jwt_secret: Option<String>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub static_dir: String,
    pub mail_relay_url: Option<String>,
    pub mail_from: Option<String>,
    pub mail_api_key: Option<String>,
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = env_opt("SW_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .expect("Invalid SW_LISTEN_ADDR");
        let cors_allow = env_opt("SW_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_opt("SW_REQUEST_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30_000);

        Config {
            listen_addr,
            db_path: env_opt("SW_DB_PATH").unwrap_or_else(|| "./db/spendwise.db".to_string()),
            jwt_secret: env_opt("SW_JWT_SECRET"),
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            static_dir: env_opt("SW_STATIC_DIR").unwrap_or_else(|| "dist".to_string()),
            mail_relay_url: env_opt("SW_MAIL_RELAY_URL"),
            mail_from: env_opt("SW_MAIL_FROM"),
            mail_api_key: env_opt("SW_MAIL_API_KEY"),
        }
    }
}
