pub mod listing_repository;
pub mod one_time_code_repository;
pub mod user_repository;

pub use listing_repository::SqliteListingRepository;
pub use one_time_code_repository::SqliteOneTimeCodeRepository;
pub use user_repository::SqliteUserRepository;

/// Fresh in-memory database with migrations applied. One connection, so
/// every query in a test sees the same database.
#[cfg(test)]
pub async fn test_pool() -> sqlx::SqlitePool {
  use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
  use std::str::FromStr;

  // Tests use synthetic user ids without inserting users rows, so the
  // fixture opts out of sqlx's default foreign-key enforcement.
  let options = SqliteConnectOptions::from_str("sqlite::memory:")
    .expect("Failed to parse in-memory database URL")
    .foreign_keys(false);

  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .connect_with(options)
    .await
    .expect("Failed to open in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}
