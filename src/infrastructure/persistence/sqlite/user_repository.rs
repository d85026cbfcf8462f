use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::auth::{
  entities::User,
  errors::{AuthError, RepositoryError},
  ports::UserRepository,
  value_objects::Email,
};

/// SQLite implementation of the UserRepository trait
pub struct SqliteUserRepository {
  pool: SqlitePool,
}

impl SqliteUserRepository {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }
}

/// Database row structure for the users table. Uuids travel as TEXT.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: String,
  email: String,
  password_hash: String,
  is_verified: bool,
  created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
  type Error = AuthError;

  fn try_from(row: UserRow) -> Result<Self, Self::Error> {
    let id = Uuid::parse_str(&row.id)
      .map_err(|e| AuthError::Repository(RepositoryError::DatabaseError(e.to_string())))?;
    Ok(User::from_db(
      id,
      row.email,
      row.password_hash,
      row.is_verified,
      row.created_at,
    ))
  }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            INSERT INTO users (id, email, password_hash, is_verified, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, email, password_hash, is_verified, created_at
            "#,
    )
    .bind(user.id.to_string())
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.is_verified)
    .bind(user.created_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, email, password_hash, is_verified, created_at
            FROM users
            WHERE id = ?
            "#,
    )
    .bind(id.to_string())
    .fetch_optional(&self.pool)
    .await?;

    row.map(User::try_from).transpose()
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, email, password_hash, is_verified, created_at
            FROM users
            WHERE email = ?
            "#,
    )
    .bind(email.as_str())
    .fetch_optional(&self.pool)
    .await?;

    row.map(User::try_from).transpose()
  }

  async fn update(&self, user: User) -> Result<User, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            UPDATE users
            SET email = ?, password_hash = ?, is_verified = ?
            WHERE id = ?
            RETURNING id, email, password_hash, is_verified, created_at
            "#,
    )
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.is_verified)
    .bind(user.id.to_string())
    .fetch_one(&self.pool)
    .await;

    match result {
      Ok(row) => row.try_into(),
      Err(sqlx::Error::RowNotFound) => Err(AuthError::Repository(RepositoryError::NotFound)),
      Err(e) => Err(e.into()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::sqlite::test_pool;

  #[tokio::test]
  async fn test_create_and_find_user() {
    let pool = test_pool().await;
    let repo = SqliteUserRepository::new(pool);

    let user = User::new("student@school.edu".to_string(), "hashed".to_string());
    let created = repo.create(user.clone()).await.unwrap();
    assert_eq!(created.id, user.id);

    let email = Email::new("student@school.edu").unwrap();
    let found = repo.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert!(!found.is_verified);

    let by_id = repo.find_by_id(user.id).await.unwrap();
    assert!(by_id.is_some());
  }

  #[tokio::test]
  async fn test_duplicate_email_is_rejected() {
    let pool = test_pool().await;
    let repo = SqliteUserRepository::new(pool);

    let first = User::new("dup@school.edu".to_string(), "hash1".to_string());
    repo.create(first).await.unwrap();

    let second = User::new("dup@school.edu".to_string(), "hash2".to_string());
    let result = repo.create(second).await;

    assert!(matches!(
      result,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_)))
    ));
  }

  #[tokio::test]
  async fn test_update_persists_verified_flag_and_password() {
    let pool = test_pool().await;
    let repo = SqliteUserRepository::new(pool);

    let user = User::new("student@school.edu".to_string(), "old-hash".to_string());
    let mut created = repo.create(user).await.unwrap();

    created.mark_verified();
    created.update_password("new-hash".to_string());
    repo.update(created.clone()).await.unwrap();

    let found = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert!(found.is_verified);
    assert_eq!(found.password_hash, "new-hash");
  }

  #[tokio::test]
  async fn test_update_missing_user() {
    let pool = test_pool().await;
    let repo = SqliteUserRepository::new(pool);

    let ghost = User::new("ghost@school.edu".to_string(), "hash".to_string());
    let result = repo.update(ghost).await;

    assert!(matches!(
      result,
      Err(AuthError::Repository(RepositoryError::NotFound))
    ));
  }
}
