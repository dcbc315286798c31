// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Number of past quiz results aggregated when building recommendations.
pub const HISTORY_WINDOW: i64 = 10;

/// Number of entries returned by the leaderboard endpoint.
pub const LEADERBOARD_SIZE: i64 = 5;

/// Weak/strong area lists are capped at this many topics.
pub const TOP_AREA_COUNT: usize = 3;

/// Number of ranked resources included in a recommendation payload.
pub const MAX_RECOMMENDED_RESOURCES: usize = 5;

/// Below this average percentage, supplementary weak-area weeks are
/// appended to the study plan.
pub const SUPPLEMENTARY_SCORE_THRESHOLD: f64 = 70.0;

/// Cap on appended supplementary weeks, one per weak area.
pub const MAX_SUPPLEMENTARY_WEEKS: usize = 3;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86400);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            admin_username: env::var("ADMIN_USERNAME").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        }
    }
}
