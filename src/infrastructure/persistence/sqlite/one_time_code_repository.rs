use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::auth::{
  entities::{CodePurpose, OneTimeCode},
  errors::{AuthError, RepositoryError},
  ports::OneTimeCodeRepository,
  value_objects::CodeHash,
};

/// SQLite implementation of the OneTimeCodeRepository trait
pub struct SqliteOneTimeCodeRepository {
  pool: SqlitePool,
}

impl SqliteOneTimeCodeRepository {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct CodeRow {
  id: String,
  user_id: String,
  purpose: String,
  code_hash: String,
  expires_at: DateTime<Utc>,
  created_at: DateTime<Utc>,
}

impl TryFrom<CodeRow> for OneTimeCode {
  type Error = AuthError;

  fn try_from(row: CodeRow) -> Result<Self, Self::Error> {
    let db_err =
      |e: String| AuthError::Repository(RepositoryError::DatabaseError(e));

    let id = Uuid::parse_str(&row.id).map_err(|e| db_err(e.to_string()))?;
    let user_id = Uuid::parse_str(&row.user_id).map_err(|e| db_err(e.to_string()))?;
    let purpose =
      CodePurpose::from_str(&row.purpose).map_err(|e| db_err(e.to_string()))?;
    let code_hash = CodeHash::from_hash(row.code_hash).map_err(|e| db_err(e.to_string()))?;

    Ok(OneTimeCode::from_db(
      id,
      user_id,
      purpose,
      code_hash,
      row.expires_at,
      row.created_at,
    ))
  }
}

#[async_trait]
impl OneTimeCodeRepository for SqliteOneTimeCodeRepository {
  async fn create(&self, code: OneTimeCode) -> Result<OneTimeCode, AuthError> {
    let row = sqlx::query_as::<_, CodeRow>(
      r#"
            INSERT INTO one_time_codes (id, user_id, purpose, code_hash, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, purpose, code_hash, expires_at, created_at
            "#,
    )
    .bind(code.id.to_string())
    .bind(code.user_id.to_string())
    .bind(code.purpose.as_str())
    .bind(code.code_hash.as_str())
    .bind(code.expires_at)
    .bind(code.created_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn find_latest(
    &self,
    user_id: Uuid,
    purpose: CodePurpose,
  ) -> Result<Option<OneTimeCode>, AuthError> {
    let row = sqlx::query_as::<_, CodeRow>(
      r#"
            SELECT id, user_id, purpose, code_hash, expires_at, created_at
            FROM one_time_codes
            WHERE user_id = ? AND purpose = ?
            ORDER BY created_at DESC
            LIMIT 1
            "#,
    )
    .bind(user_id.to_string())
    .bind(purpose.as_str())
    .fetch_optional(&self.pool)
    .await?;

    row.map(OneTimeCode::try_from).transpose()
  }

  async fn delete_for_user(&self, user_id: Uuid, purpose: CodePurpose) -> Result<(), AuthError> {
    sqlx::query("DELETE FROM one_time_codes WHERE user_id = ? AND purpose = ?")
      .bind(user_id.to_string())
      .bind(purpose.as_str())
      .execute(&self.pool)
      .await?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::value_objects::SecretCode;
  use crate::infrastructure::persistence::sqlite::test_pool;

  fn code_for(user_id: Uuid, purpose: CodePurpose) -> OneTimeCode {
    OneTimeCode::new(user_id, purpose, SecretCode::generate().hash())
  }

  #[tokio::test]
  async fn test_create_and_find_latest() {
    let pool = test_pool().await;
    let repo = SqliteOneTimeCodeRepository::new(pool);
    let user_id = Uuid::new_v4();

    let code = code_for(user_id, CodePurpose::Verification);
    repo.create(code.clone()).await.unwrap();

    let found = repo
      .find_latest(user_id, CodePurpose::Verification)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(found.id, code.id);
    assert_eq!(found.code_hash, code.code_hash);

    // Purposes are independent namespaces
    let reset = repo.find_latest(user_id, CodePurpose::Reset).await.unwrap();
    assert!(reset.is_none());
  }

  #[tokio::test]
  async fn test_latest_wins_across_multiple_rows() {
    let pool = test_pool().await;
    let repo = SqliteOneTimeCodeRepository::new(pool);
    let user_id = Uuid::new_v4();

    let mut first = code_for(user_id, CodePurpose::Reset);
    first.created_at -= chrono::Duration::seconds(30);
    first.expires_at -= chrono::Duration::seconds(30);
    repo.create(first).await.unwrap();

    let second = code_for(user_id, CodePurpose::Reset);
    repo.create(second.clone()).await.unwrap();

    let found = repo
      .find_latest(user_id, CodePurpose::Reset)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(found.id, second.id);
  }

  #[tokio::test]
  async fn test_delete_for_user_is_scoped_by_purpose() {
    let pool = test_pool().await;
    let repo = SqliteOneTimeCodeRepository::new(pool);
    let user_id = Uuid::new_v4();

    repo
      .create(code_for(user_id, CodePurpose::Verification))
      .await
      .unwrap();
    repo.create(code_for(user_id, CodePurpose::Reset)).await.unwrap();

    repo
      .delete_for_user(user_id, CodePurpose::Verification)
      .await
      .unwrap();

    let verification = repo
      .find_latest(user_id, CodePurpose::Verification)
      .await
      .unwrap();
    assert!(verification.is_none());

    let reset = repo.find_latest(user_id, CodePurpose::Reset).await.unwrap();
    assert!(reset.is_some());
  }
}
