use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::entities::{CodePurpose, OneTimeCode, User};
use super::errors::AuthError;
use super::value_objects::Email;

/// Repository trait for user persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Creates a new user. Fails with a duplicate-key repository error when
  /// the email is already taken.
  async fn create(&self, user: User) -> Result<User, AuthError>;

  /// Finds a user by their unique identifier
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

  /// Finds a user by their (lowercased) email address
  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError>;

  /// Updates an existing user (verified flag, password hash)
  async fn update(&self, user: User) -> Result<User, AuthError>;
}

/// Repository trait for one-time code persistence operations
#[async_trait]
pub trait OneTimeCodeRepository: Send + Sync {
  /// Stores a new code record
  async fn create(&self, code: OneTimeCode) -> Result<OneTimeCode, AuthError>;

  /// Returns the most recently created code for (user, purpose), if any.
  /// Older rows for the same purpose are superseded and never consulted.
  async fn find_latest(
    &self,
    user_id: Uuid,
    purpose: CodePurpose,
  ) -> Result<Option<OneTimeCode>, AuthError>;

  /// Deletes every code for (user, purpose). Used both to consume codes on
  /// success and to supersede prior codes at issuance.
  async fn delete_for_user(&self, user_id: Uuid, purpose: CodePurpose) -> Result<(), AuthError>;
}

/// A signed, time-bound bearer credential asserting an authenticated identity
#[derive(Debug, Clone)]
pub struct AccessToken {
  pub token: String,
  pub expires_at: DateTime<Utc>,
}

/// Identity asserted by a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
  pub user_id: Uuid,
  pub email: String,
}

/// Mints and verifies signed, tamper-evident bearer tokens. Stateless: there
/// is no revocation list, so logout is client-side discard only.
pub trait TokenIssuer: Send + Sync {
  /// Issues a token asserting (user_id, email), valid for 7 days
  fn issue(&self, user_id: Uuid, email: &str) -> Result<AccessToken, AuthError>;

  /// Verifies a token, failing with `InvalidToken` on bad signature,
  /// malformed payload, or expiry
  fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;
}
