use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

// Default timeout functions
fn default_db_connect_timeout() -> u64 {
  5
}

fn default_db_acquire_timeout() -> u64 {
  3
}

fn default_token_ttl_days() -> i64 {
  7
}

fn default_startup_delay_seconds() -> u64 {
  3
}

fn default_sweep_interval_seconds() -> u64 {
  3600
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub database: DatabaseConfig,
  pub security: SecurityConfig,
  pub marketplace: MarketplaceConfig,
  pub notification: NotificationConfig,
  pub storage: StorageConfig,
  #[serde(default)]
  pub cleanup: CleanupConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
  pub url: String,
  pub max_connections: u32,
  #[serde(default = "default_db_connect_timeout")]
  pub connect_timeout_seconds: u64,
  #[serde(default = "default_db_acquire_timeout")]
  pub acquire_timeout_seconds: u64,
}

/// Security configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
  /// HMAC secret for access tokens
  /// Generate with: openssl rand -base64 32
  pub jwt_secret: String,
  #[serde(default = "default_token_ttl_days")]
  pub token_ttl_days: i64,
}

/// Marketplace policy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceConfig {
  /// Email domain registrations are restricted to, e.g. "gettysburg.edu"
  pub campus_domain: String,
}

/// Outbound email configuration. Without an API key the mail gateway is
/// disabled and codes land in the fallback log only.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
  #[serde(default)]
  pub resend_api_key: Option<String>,
  pub from_address: String,
  pub fallback_log_path: String,
}

/// Blob storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
  pub uploads_dir: String,
}

/// Sweep cadence and age thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct CleanupConfig {
  pub warn_after_days: i64,
  pub expire_after_days: i64,
  pub purge_sold_after_days: i64,
  #[serde(default = "default_startup_delay_seconds")]
  pub startup_delay_seconds: u64,
  #[serde(default = "default_sweep_interval_seconds")]
  pub interval_seconds: u64,
}

impl Default for CleanupConfig {
  fn default() -> Self {
    Self {
      warn_after_days: 29,
      expire_after_days: 30,
      purge_sold_after_days: 7,
      startup_delay_seconds: default_startup_delay_seconds(),
      interval_seconds: default_sweep_interval_seconds(),
    }
  }
}

impl Config {
  /// Load configuration from files and environment variables
  ///
  /// Configuration is loaded in the following order (later sources override earlier ones):
  /// 1. config/default.toml
  /// 2. config/local.toml (if exists)
  /// 3. Environment variables with CAMPUS_MARKET_ prefix
  ///
  /// Environment variables use double underscores as the section separator:
  /// - `CAMPUS_MARKET_DATABASE__URL=sqlite://data/market.db`
  /// - `CAMPUS_MARKET_SECURITY__JWT_SECRET=...`
  /// - `CAMPUS_MARKET_MARKETPLACE__CAMPUS_DOMAIN=gettysburg.edu`
  /// - `CAMPUS_MARKET_NOTIFICATION__RESEND_API_KEY=re_...`
  ///
  /// # Errors
  /// Returns a `ConfigError` when required files are missing, the TOML is
  /// invalid, or required values are missing or mistyped
  pub fn load() -> Result<Self, ConfigError> {
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    let config = ConfigBuilder::builder()
      .add_source(File::with_name("config/default").required(true))
      .add_source(File::with_name("config/local").required(false))
      .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
      .add_source(
        Environment::with_prefix("CAMPUS_MARKET")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;

    config.try_deserialize()
  }
}
