// product_search_api/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,

  // Search engine
  pub elasticsearch_url: String,
  pub elasticsearch_index: String,
  /// Deadline for a single engine call, also used as the HTTP client timeout.
  pub elasticsearch_timeout: Duration,

  // Optional: fill the index with synthetic products on startup
  pub seed_db: bool,
  pub seed_count: usize,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source. Empty values count as unset.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |name: &str, default: &str| {
      lookup(name)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
    };

    let server_host = get_env("SERVER_HOST", "0.0.0.0");
    let server_port = parse_var::<u16>("SERVER_PORT", &get_env("SERVER_PORT", "8080"))?;
    let elasticsearch_url = get_env("ELASTICSEARCH_URL", "http://localhost:9200")
      .trim_end_matches('/')
      .to_string();
    let elasticsearch_index = get_env("ELASTICSEARCH_INDEX", "products");
    let timeout_secs = parse_var::<u64>(
      "ELASTICSEARCH_TIMEOUT_SECS",
      &get_env("ELASTICSEARCH_TIMEOUT_SECS", "30"),
    )?;
    if timeout_secs == 0 {
      return Err(AppError::Config("ELASTICSEARCH_TIMEOUT_SECS must be at least 1".to_string()));
    }

    let seed_db = parse_var::<bool>("SEED_DB", &get_env("SEED_DB", "false"))?;
    let seed_count = parse_var::<usize>("SEED_COUNT", &get_env("SEED_COUNT", "100"))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      elasticsearch_url,
      elasticsearch_index,
      elasticsearch_timeout: Duration::from_secs(timeout_secs),
      seed_db,
      seed_count,
    })
  }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  raw
    .trim()
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", name, raw, e)))
}
