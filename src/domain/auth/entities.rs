use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::value_objects::{CodeHash, ValueObjectError};

/// One-time codes are valid for 10 minutes from issuance
pub const CODE_TTL_MINUTES: i64 = 10;

/// User entity representing a marketplace account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  /// Unique identifier for the user
  pub id: Uuid,
  /// User's campus email address (unique, lowercase)
  pub email: String,
  /// Hashed password using Argon2
  pub password_hash: String,
  /// Whether the user's email has been verified
  pub is_verified: bool,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
}

impl User {
  /// Creates a new unverified user
  pub fn new(email: String, password_hash: String) -> Self {
    Self {
      id: Uuid::new_v4(),
      email,
      password_hash,
      is_verified: false,
      created_at: Utc::now(),
    }
  }

  /// Creates a user from database fields (for reconstruction)
  pub fn from_db(
    id: Uuid,
    email: String,
    password_hash: String,
    is_verified: bool,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      email,
      password_hash,
      is_verified,
      created_at,
    }
  }

  /// Marks the account as verified. Flips exactly once; calling it on an
  /// already-verified account is a no-op.
  pub fn mark_verified(&mut self) {
    self.is_verified = true;
  }

  /// Replaces the stored password hash
  pub fn update_password(&mut self, new_password_hash: String) {
    self.password_hash = new_password_hash;
  }
}

/// What a one-time code proves when consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodePurpose {
  /// Email verification during account activation
  Verification,
  /// Password reset for a verified account
  Reset,
}

impl CodePurpose {
  pub fn as_str(&self) -> &'static str {
    match self {
      CodePurpose::Verification => "verification",
      CodePurpose::Reset => "reset",
    }
  }
}

impl FromStr for CodePurpose {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "verification" => Ok(CodePurpose::Verification),
      "reset" => Ok(CodePurpose::Reset),
      _ => Err(ValueObjectError::InvalidCode),
    }
  }
}

impl fmt::Display for CodePurpose {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// OneTimeCode entity: a pending secret challenge for a user.
/// Only the hash of the code is ever stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneTimeCode {
  /// Unique identifier for the code row
  pub id: Uuid,
  /// The user this challenge belongs to
  pub user_id: Uuid,
  /// What the code proves when consumed
  pub purpose: CodePurpose,
  /// SHA-256 hash of the plaintext code
  pub code_hash: CodeHash,
  /// Hard expiry; enforced at verification time, not by background deletion
  pub expires_at: DateTime<Utc>,
  /// Timestamp when the code was issued
  pub created_at: DateTime<Utc>,
}

impl OneTimeCode {
  /// Creates a new code record expiring CODE_TTL_MINUTES from now
  pub fn new(user_id: Uuid, purpose: CodePurpose, code_hash: CodeHash) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      user_id,
      purpose,
      code_hash,
      expires_at: now + Duration::minutes(CODE_TTL_MINUTES),
      created_at: now,
    }
  }

  /// Creates a code record from database fields (for reconstruction)
  pub fn from_db(
    id: Uuid,
    user_id: Uuid,
    purpose: CodePurpose,
    code_hash: CodeHash,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      user_id,
      purpose,
      code_hash,
      expires_at,
      created_at,
    }
  }

  /// Checks if the code has passed its expiry
  pub fn is_expired(&self) -> bool {
    self.expires_at <= Utc::now()
  }
}
