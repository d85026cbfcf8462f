use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash as Argon2PasswordHash, PasswordHasher, PasswordVerifier};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use validator::ValidateEmail;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ValueObjectError {
  #[error("Invalid email format: {0}")]
  InvalidEmail(String),

  #[error("Password is too short (minimum 8 characters)")]
  PasswordTooShort,

  #[error("Password is too long (maximum 128 characters)")]
  PasswordTooLong,

  #[error("Invalid password hash format")]
  InvalidPasswordHash,

  #[error("Password hashing failed: {0}")]
  HashingFailed(String),

  #[error("Password verification failed: {0}")]
  VerificationFailed(String),

  #[error("Invalid code format")]
  InvalidCode,

  #[error("Invalid code hash format")]
  InvalidCodeHash,
}

// ============================================================================
// Email Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  /// Creates a new Email after validation, normalized to lowercase
  pub fn new(email: impl Into<String>) -> Result<Self, ValueObjectError> {
    let email = email.into();

    if !email.validate_email() {
      return Err(ValueObjectError::InvalidEmail(email));
    }

    Ok(Self(email.to_lowercase()))
  }

  /// Returns the email as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for Email {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

// ============================================================================
// CampusDomain Value Object
// ============================================================================

/// The institutional email domain accounts must belong to.
/// Matching is a case-insensitive `@domain` suffix check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusDomain(String);

impl CampusDomain {
  pub fn new(domain: impl Into<String>) -> Self {
    let domain = domain.into();
    Self(domain.trim().trim_start_matches('@').to_lowercase())
  }

  /// Returns true iff the email belongs to this campus domain
  pub fn accepts(&self, email: &Email) -> bool {
    email.as_str().ends_with(&format!("@{}", self.0))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for CampusDomain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

#[derive(Clone)]
pub struct Password(String);

impl Password {
  const MIN_LENGTH: usize = 8;
  const MAX_LENGTH: usize = 128;

  /// Creates a new Password after validation
  pub fn new(password: impl Into<String>) -> Result<Self, ValueObjectError> {
    let password = password.into();

    if password.len() < Self::MIN_LENGTH {
      return Err(ValueObjectError::PasswordTooShort);
    }

    if password.len() > Self::MAX_LENGTH {
      return Err(ValueObjectError::PasswordTooLong);
    }

    Ok(Self(password))
  }

  /// Hashes the password using Argon2id
  pub fn hash(&self) -> Result<PasswordHash, ValueObjectError> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
      .hash_password(self.0.as_bytes(), &salt)
      .map_err(|e| ValueObjectError::HashingFailed(e.to_string()))?;

    Ok(PasswordHash(hash.to_string()))
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Implement Debug without exposing the password
impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

// Implement Display without exposing the password
impl fmt::Display for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("***")
  }
}

// ============================================================================
// PasswordHash Value Object (Argon2id Hash)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Creates a new PasswordHash from an existing hash string
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, ValueObjectError> {
    let hash = hash.into();

    // Validate it's a proper Argon2 hash
    Argon2PasswordHash::new(&hash).map_err(|_| ValueObjectError::InvalidPasswordHash)?;

    Ok(Self(hash))
  }

  /// Verifies a password against this hash
  pub fn verify(&self, password: &Password) -> Result<bool, ValueObjectError> {
    let parsed_hash = Argon2PasswordHash::new(&self.0)
      .map_err(|e| ValueObjectError::VerificationFailed(e.to_string()))?;

    let argon2 = Argon2::default();

    Ok(
      argon2
        .verify_password(password.as_str().as_bytes(), &parsed_hash)
        .is_ok(),
    )
  }

  /// Returns the hash as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for PasswordHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// SecretCode Value Object (One-Time Numeric Code - Never Stored)
// ============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct SecretCode(String);

impl SecretCode {
  const DIGITS: usize = 6;

  /// Generates a new uniformly random 6-digit code (100000..=999999)
  pub fn generate() -> Self {
    let value: u32 = rand::rngs::OsRng.gen_range(100_000..1_000_000);
    Self(value.to_string())
  }

  /// Creates a SecretCode from user input
  pub fn from_input(code: impl Into<String>) -> Result<Self, ValueObjectError> {
    let code = code.into().trim().to_string();

    if code.len() != Self::DIGITS || !code.chars().all(|c| c.is_ascii_digit()) {
      return Err(ValueObjectError::InvalidCode);
    }

    Ok(Self(code))
  }

  /// Creates a hash of this code for storage
  pub fn hash(&self) -> CodeHash {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(self.0.as_bytes());
    let result = hasher.finalize();

    CodeHash(hex::encode(result))
  }

  /// Returns the code as a string slice (only for delivery to the owner)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Implement Debug without exposing the code
impl fmt::Debug for SecretCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("SecretCode(***)")
  }
}

impl fmt::Display for SecretCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("***")
  }
}

// ============================================================================
// CodeHash Value Object (SHA-256 Hash of a SecretCode)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeHash(String);

impl CodeHash {
  /// Creates a CodeHash from an existing hash string
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, ValueObjectError> {
    let hash = hash.into();

    // SHA-256 produces 64 hex characters
    if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
      return Err(ValueObjectError::InvalidCodeHash);
    }

    Ok(Self(hash))
  }

  /// Verifies a candidate code against this hash
  pub fn verify(&self, code: &SecretCode) -> bool {
    self.0 == code.hash().0
  }

  /// Returns the hash as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for CodeHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
