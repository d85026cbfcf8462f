use thiserror::Error;

use super::value_objects::ValueObjectError;

/// Main credential lifecycle error type
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("Must use a valid campus email")]
  InvalidEmailDomain,

  #[error("Password must be at least 8 characters")]
  WeakPassword,

  #[error("Account already exists")]
  DuplicateAccount,

  #[error("Account not found")]
  AccountNotFound,

  #[error("No pending code for this account")]
  NoPendingCode,

  #[error("Code expired, request a new one")]
  CodeExpired,

  #[error("Invalid code")]
  InvalidCode,

  // One message for unknown email and wrong password, so callers
  // cannot enumerate accounts.
  #[error("Invalid credentials")]
  InvalidCredentials,

  #[error("Please verify your email before logging in")]
  EmailNotVerified,

  #[error("Invalid or expired token")]
  InvalidToken,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),
}

// Automatic conversions from external error types

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::Repository(RepositoryError::from(error))
  }
}

impl From<ValueObjectError> for AuthError {
  fn from(error: ValueObjectError) -> Self {
    match error {
      // A malformed email can never belong to the campus domain
      ValueObjectError::InvalidEmail(_) => AuthError::InvalidEmailDomain,
      ValueObjectError::PasswordTooShort | ValueObjectError::PasswordTooLong => {
        AuthError::WeakPassword
      }
      ValueObjectError::InvalidCode => AuthError::InvalidCode,
      ValueObjectError::InvalidPasswordHash
      | ValueObjectError::InvalidCodeHash
      | ValueObjectError::HashingFailed(_)
      | ValueObjectError::VerificationFailed(_) => {
        AuthError::Repository(RepositoryError::DatabaseError(error.to_string()))
      }
    }
  }
}
