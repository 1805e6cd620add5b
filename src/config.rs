use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "https://a2sv-backend.onrender.com/api";
pub const DEFAULT_RESOURCE: &str = "Food";

#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    /// Reads younger than this are served from cache without a request.
    pub stale_secs: u64,
    /// Per-id entries unused for this long are dropped.
    pub gc_secs: u64,
}

impl QueryConfig {
    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_secs)
    }

    pub fn gc_time(&self) -> Duration {
        Duration::from_secs(self.gc_secs)
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_secs: 5 * 60,
            gc_secs: 10 * 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api_url: String,
    pub resource: String,
    pub http_timeout_secs: u64,
    pub page_size: usize,
    pub query: QueryConfig,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            resource: DEFAULT_RESOURCE.into(),
            http_timeout_secs: 30,
            page_size: 8,
            query: QueryConfig::default(),
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let config = Self {
            api_url: std::env::var("FOOD_API_URL").unwrap_or(defaults.api_url),
            resource: std::env::var("FOOD_RESOURCE").unwrap_or(defaults.resource),
            http_timeout_secs: env_parse("HTTP_TIMEOUT_SECS").unwrap_or(defaults.http_timeout_secs),
            page_size: env_parse("PAGE_SIZE")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.page_size),
            query: QueryConfig {
                stale_secs: env_parse("QUERY_STALE_SECS").unwrap_or(defaults.query.stale_secs),
                gc_secs: env_parse("QUERY_GC_SECS").unwrap_or(defaults.query.gc_secs),
            },
            host: std::env::var("APP_HOST").unwrap_or(defaults.host),
            port: env_parse("APP_PORT").unwrap_or(defaults.port),
        };
        anyhow::ensure!(
            crate::meals::validation::is_valid_url(&config.api_url),
            "FOOD_API_URL is not an absolute url: {}",
            config.api_url
        );
        Ok(config)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}
