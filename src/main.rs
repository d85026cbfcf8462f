use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_market::{
  domain::cleanup::{CleanupPolicy, CleanupService},
  infrastructure::{
    config::Config,
    notification::ResendGateway,
    persistence::sqlite::{SqliteListingRepository, SqliteUserRepository},
    scheduler::CleanupScheduler,
    storage::LocalBlobStore,
  },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "campus_market=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting Campus Market");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  // Set up database connection pool with timeout
  tracing::info!("Opening database: {}", config.database.url);

  let connect_options = SqliteConnectOptions::from_str(&config.database.url)
    .context("Invalid database URL")?
    .create_if_missing(true);

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    SqlitePoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect_with(connect_options),
  )
  .await
  .with_context(|| {
    format!(
      "Database open timed out after {} seconds",
      config.database.connect_timeout_seconds
    )
  })?
  .context("Failed to open database")?;

  tracing::info!("Database connection pool created");

  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .context("Failed to run database migrations")?;
  tracing::info!("Database migrations completed");

  // Initialize repositories and adapters the sweep depends on
  let user_repo = Arc::new(SqliteUserRepository::new(db_pool.clone()));
  let listing_repo = Arc::new(SqliteListingRepository::new(db_pool.clone()));
  let gateway = Arc::new(ResendGateway::new(
    config.notification.resend_api_key.clone(),
    config.notification.from_address.clone(),
  ));
  let blob_store = Arc::new(LocalBlobStore::new(config.storage.uploads_dir.clone()));

  if config.notification.resend_api_key.is_none() {
    tracing::warn!(
      "No Resend API key configured; codes will be written to {}",
      config.notification.fallback_log_path
    );
  }

  let cleanup_service = Arc::new(CleanupService::new(
    listing_repo,
    user_repo,
    blob_store,
    gateway,
    CleanupPolicy {
      warn_after_days: config.cleanup.warn_after_days,
      expire_after_days: config.cleanup.expire_after_days,
      purge_sold_after_days: config.cleanup.purge_sold_after_days,
    },
  ));

  // Start the periodic cleanup sweep
  let mut scheduler = CleanupScheduler::new(
    cleanup_service,
    Duration::from_secs(config.cleanup.startup_delay_seconds),
    Duration::from_secs(config.cleanup.interval_seconds),
  );
  scheduler.start();
  tracing::info!(
    interval_seconds = config.cleanup.interval_seconds,
    "Cleanup scheduler started"
  );

  tokio::signal::ctrl_c()
    .await
    .context("Failed to listen for shutdown signal")?;

  tracing::info!("Shutting down");
  scheduler.stop().await;
  db_pool.close().await;

  Ok(())
}
