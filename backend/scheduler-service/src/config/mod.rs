use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub host: String,
    pub port: u16,
}

/// Store connection settings. Without a URL the service runs storeless and
/// every operation degrades to its fallback.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    /// Per-query bound; a timeout counts as the store being unavailable
    pub query_timeout_ms: u64,
    /// Create the scheduler tables at startup when missing
    pub ensure_schema: bool,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
            .field("max_connections", &self.max_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("query_timeout_ms", &self.query_timeout_ms)
            .field("ensure_schema", &self.ensure_schema)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Account used when a request names none
    pub default_account: String,
    /// Topic used when no recent item title is available
    pub default_topic: String,
    /// Manual weight overrides are rejected while this is unset
    pub admin_token: Option<String>,
    pub history_limit: i64,
    pub default_trends_limit: usize,
    pub default_generate_length: usize,
}

impl fmt::Debug for SchedulerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerConfig")
            .field("default_account", &self.default_account)
            .field("default_topic", &self.default_topic)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "[REDACTED]"))
            .field("history_limit", &self.history_limit)
            .field("default_trends_limit", &self.default_trends_limit)
            .field("default_generate_length", &self.default_generate_length)
            .finish()
    }
}

pub const DEFAULT_ACCOUNT: &str = "vibecodinglatam";
pub const DEFAULT_TOPIC: &str = "Innovación humana y colaboración IA";

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_account: DEFAULT_ACCOUNT.to_string(),
            default_topic: DEFAULT_TOPIC.to_string(),
            admin_token: None,
            history_limit: 200,
            default_trends_limit: 6,
            default_generate_length: 120,
        }
    }
}

impl Config {
    /// Load `.env` (if present) and read the environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        let defaults = SchedulerConfig::default();

        Ok(Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                host: std::env::var("SCHEDULER_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env_or("SCHEDULER_SERVICE_PORT", 8000)?,
            },
            database: DatabaseConfig {
                url: non_empty_var("DATABASE_URL"),
                max_connections: env_or("DB_MAX_CONNECTIONS", 10)?,
                connect_timeout_secs: env_or("DB_CONNECT_TIMEOUT_SECS", 5)?,
                query_timeout_ms: env_or("DB_QUERY_TIMEOUT_MS", 3_000)?,
                ensure_schema: env_or("DB_ENSURE_SCHEMA", false)?,
            },
            scheduler: SchedulerConfig {
                default_account: non_empty_var("SCHEDULER_DEFAULT_ACCOUNT")
                    .unwrap_or(defaults.default_account),
                default_topic: non_empty_var("SCHEDULER_DEFAULT_TOPIC")
                    .unwrap_or(defaults.default_topic),
                admin_token: non_empty_var("ADMIN_TOKEN"),
                history_limit: env_or("SCHEDULER_HISTORY_LIMIT", defaults.history_limit)?,
                default_trends_limit: env_or(
                    "SCHEDULER_TRENDS_LIMIT",
                    defaults.default_trends_limit,
                )?,
                default_generate_length: env_or(
                    "SCHEDULER_GENERATE_LENGTH",
                    defaults.default_generate_length,
                )?,
            },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse `key` when set, otherwise use `default`. Malformed values are errors.
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty_var(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
