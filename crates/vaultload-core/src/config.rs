//! Configuration module
//!
//! Settings are read from the environment (and a `.env` file when present):
//! database connection, bag store and bag index locations, the configuration
//! directory holding the account substitutions, and the retry/concurrency knobs
//! of the loader.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

// Common constants
const MAX_CONNECTIONS: u32 = 5;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const HTTP_TIMEOUT_SECS: u64 = 60;
const SAVE_MAX_ATTEMPTS: u32 = 3;
const SAVE_RETRY_DELAY_MS: u64 = 500;
const LOAD_CONCURRENCY: usize = 1;
const CONFIG_DIR: &str = "./cfg";

/// Loader configuration
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Base URL of the bag store, always ending with '/'
    pub bag_store_url: String,
    /// Base URL of the bag index, always ending with '/'
    pub bag_index_url: String,
    pub config_dir: PathBuf,
    pub http_timeout_seconds: u64,
    pub save_max_attempts: u32,
    pub save_retry_delay_ms: u64,
    /// Number of top-level identifiers processed at the same time
    pub load_concurrency: usize,
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Appends the trailing slash that relative resolution of `bags/<uuid>` relies on.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

impl LoaderConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let bag_store_url = env::var("BAG_STORE_URL")
            .map_err(|_| anyhow::anyhow!("BAG_STORE_URL must be set"))?;
        let bag_index_url = env::var("BAG_INDEX_URL")
            .map_err(|_| anyhow::anyhow!("BAG_INDEX_URL must be set"))?;

        let config = LoaderConfig {
            database_url,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: parse_or("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            bag_store_url: normalize_base_url(&bag_store_url),
            bag_index_url: normalize_base_url(&bag_index_url),
            config_dir: env::var("CONFIG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(CONFIG_DIR)),
            http_timeout_seconds: parse_or("HTTP_TIMEOUT_SECONDS", HTTP_TIMEOUT_SECS),
            save_max_attempts: parse_or("SAVE_MAX_ATTEMPTS", SAVE_MAX_ATTEMPTS),
            save_retry_delay_ms: parse_or("SAVE_RETRY_DELAY_MS", SAVE_RETRY_DELAY_MS),
            load_concurrency: parse_or("LOAD_CONCURRENCY", LOAD_CONCURRENCY),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        for (name, url) in [
            ("BAG_STORE_URL", &self.bag_store_url),
            ("BAG_INDEX_URL", &self.bag_index_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!(
                    "{} must be an http(s) URL, got '{}'",
                    name,
                    url
                ));
            }
        }
        if self.save_max_attempts == 0 {
            return Err(anyhow::anyhow!("SAVE_MAX_ATTEMPTS must be at least 1"));
        }
        if self.load_concurrency == 0 {
            return Err(anyhow::anyhow!("LOAD_CONCURRENCY must be at least 1"));
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    pub fn save_retry_delay(&self) -> Duration {
        Duration::from_millis(self.save_retry_delay_ms)
    }
}
