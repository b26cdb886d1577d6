//! Application configuration loaded from environment variables.

use std::env;

use murmur_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Default page size for home and profile feeds.
    pub posts_per_page: u64,
    /// Hard cap on search results per request.
    pub search_max_results: u64,
    pub session_ttl_hours: i64,
    pub sweeper_enabled: bool,
    /// Six-field cron expression for the session sweeper.
    pub sweeper_schedule: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env_parse("DB_MAX_CONNECTIONS", 100),
            min_connections: env_parse("DB_MIN_CONNECTIONS", 10),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_parse("PORT", 8080),
            database,
            posts_per_page: env_parse("POSTS_PER_PAGE", 25),
            search_max_results: env_parse("MAX_SEARCH_RESULTS", 50),
            session_ttl_hours: env_parse("SESSION_TTL_HOURS", 72),
            sweeper_enabled: env::var("SESSION_SWEEPER_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            sweeper_schedule: env::var("SESSION_SWEEPER_SCHEDULE")
                .unwrap_or_else(|_| "0 0 * * * *".to_string()),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
