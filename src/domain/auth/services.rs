use std::sync::Arc;
use uuid::Uuid;

use crate::domain::notification::{DeliveryFallback, NotificationGateway};

use super::entities::{CODE_TTL_MINUTES, CodePurpose, OneTimeCode, User};
use super::errors::{AuthError, RepositoryError};
use super::ports::{AccessToken, OneTimeCodeRepository, TokenIssuer, UserRepository};
use super::value_objects::{CampusDomain, Email, Password, PasswordHash, SecretCode};

/// Configuration for the credential lifecycle
pub struct CredentialServiceConfig {
  /// Institutional domain registrations are restricted to
  pub campus_domain: CampusDomain,
}

/// Credential lifecycle service: registration, verification, login and
/// password recovery for campus accounts.
///
/// Account states: unregistered -> pending-verification -> verified.
/// Password reset is an orthogonal sub-flow reachable from any registered
/// account.
pub struct CredentialService {
  user_repo: Arc<dyn UserRepository>,
  code_repo: Arc<dyn OneTimeCodeRepository>,
  token_issuer: Arc<dyn TokenIssuer>,
  gateway: Arc<dyn NotificationGateway>,
  fallback: Arc<dyn DeliveryFallback>,
  campus_domain: CampusDomain,
}

impl CredentialService {
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    code_repo: Arc<dyn OneTimeCodeRepository>,
    token_issuer: Arc<dyn TokenIssuer>,
    gateway: Arc<dyn NotificationGateway>,
    fallback: Arc<dyn DeliveryFallback>,
    config: CredentialServiceConfig,
  ) -> Self {
    Self {
      user_repo,
      code_repo,
      token_issuer,
      gateway,
      fallback,
      campus_domain: config.campus_domain,
    }
  }

  /// Registers a new account and issues its verification code.
  ///
  /// # Errors
  /// - `InvalidEmailDomain` unless the email matches the campus domain
  /// - `DuplicateAccount` if the email is already registered
  ///
  /// Code delivery failure is non-fatal: the registration still succeeds
  /// and the code is preserved in the durable fallback log.
  pub async fn register(&self, email: Email, password: Password) -> Result<User, AuthError> {
    self.require_campus_email(&email)?;

    if self.user_repo.find_by_email(&email).await?.is_some() {
      return Err(AuthError::DuplicateAccount);
    }

    let password_hash = password.hash()?;
    let user = User::new(email.into_inner(), password_hash.into_inner());

    let created = match self.user_repo.create(user).await {
      Ok(user) => user,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_))) => {
        return Err(AuthError::DuplicateAccount);
      }
      Err(e) => return Err(e),
    };

    self
      .issue_and_dispatch_code(&created, CodePurpose::Verification)
      .await?;

    Ok(created)
  }

  /// Verifies an account with a one-time code and issues a token.
  ///
  /// Verifying an already-verified account succeeds idempotently with a
  /// fresh token; the code is not consulted in that case.
  ///
  /// # Errors
  /// `AccountNotFound`, `NoPendingCode`, `CodeExpired`, `InvalidCode`
  pub async fn verify_email(
    &self,
    email: Email,
    code: &str,
  ) -> Result<(User, AccessToken), AuthError> {
    let mut user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::AccountNotFound)?;

    if user.is_verified {
      let token = self.token_issuer.issue(user.id, &user.email)?;
      return Ok((user, token));
    }

    self
      .consume_code(user.id, CodePurpose::Verification, code)
      .await?;

    user.mark_verified();
    let user = self.user_repo.update(user).await?;

    let token = self.token_issuer.issue(user.id, &user.email)?;
    Ok((user, token))
  }

  /// Authenticates an account and issues a token.
  ///
  /// Unknown email and wrong password both fail `InvalidCredentials` with
  /// the same shape. A correct password on an unverified account fails
  /// `EmailNotVerified`.
  pub async fn login(&self, email: Email, password: &str) -> Result<(User, AccessToken), AuthError> {
    let user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::InvalidCredentials)?;

    let password = Password::new(password).map_err(|_| AuthError::InvalidCredentials)?;
    let stored = PasswordHash::from_hash(&user.password_hash)?;

    if !stored.verify(&password)? {
      return Err(AuthError::InvalidCredentials);
    }

    if !user.is_verified {
      return Err(AuthError::EmailNotVerified);
    }

    let token = self.token_issuer.issue(user.id, &user.email)?;
    Ok((user, token))
  }

  /// Issues and dispatches a password reset code.
  pub async fn forgot_password(&self, email: Email) -> Result<(), AuthError> {
    self.require_campus_email(&email)?;

    let user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::AccountNotFound)?;

    self.issue_and_dispatch_code(&user, CodePurpose::Reset).await
  }

  /// Replaces the account password after validating a reset code.
  pub async fn reset_password(
    &self,
    email: Email,
    code: &str,
    new_password: Password,
  ) -> Result<(), AuthError> {
    self.require_campus_email(&email)?;

    let mut user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::AccountNotFound)?;

    self.consume_code(user.id, CodePurpose::Reset, code).await?;

    let password_hash = new_password.hash()?;
    user.update_password(password_hash.into_inner());
    self.user_repo.update(user).await?;

    Ok(())
  }

  fn require_campus_email(&self, email: &Email) -> Result<(), AuthError> {
    if self.campus_domain.accepts(email) {
      Ok(())
    } else {
      Err(AuthError::InvalidEmailDomain)
    }
  }

  /// Validates the latest pending code for (user, purpose) and deletes all
  /// codes for that purpose on success. Expiry is checked here, at
  /// verification time; there is no race with background deletion because
  /// nothing deletes codes in the background.
  async fn consume_code(
    &self,
    user_id: Uuid,
    purpose: CodePurpose,
    candidate: &str,
  ) -> Result<(), AuthError> {
    let record = self
      .code_repo
      .find_latest(user_id, purpose)
      .await?
      .ok_or(AuthError::NoPendingCode)?;

    if record.is_expired() {
      return Err(AuthError::CodeExpired);
    }

    let candidate = SecretCode::from_input(candidate).map_err(|_| AuthError::InvalidCode)?;
    if !record.code_hash.verify(&candidate) {
      return Err(AuthError::InvalidCode);
    }

    self.code_repo.delete_for_user(user_id, purpose).await?;
    Ok(())
  }

  /// Issues a fresh code, superseding any prior codes for the same purpose,
  /// and attempts delivery. Prior codes are deleted explicitly rather than
  /// left to "latest row wins" query ordering.
  ///
  /// This is the single boundary where the non-fatal delivery policy is
  /// applied: a delivery failure is logged and the plaintext preserved in
  /// the durable fallback log, and the caller's operation still succeeds.
  async fn issue_and_dispatch_code(
    &self,
    user: &User,
    purpose: CodePurpose,
  ) -> Result<(), AuthError> {
    self.code_repo.delete_for_user(user.id, purpose).await?;

    let code = SecretCode::generate();
    let record = OneTimeCode::new(user.id, purpose, code.hash());
    self.code_repo.create(record).await?;

    let (subject, label) = match purpose {
      CodePurpose::Verification => ("Your Campus Market verification code", "verification code"),
      CodePurpose::Reset => ("Your Campus Market password reset code", "password reset code"),
    };
    let body = format!(
      "Your {} is: {}\n\nThis code expires in {} minutes.",
      label,
      code.as_str(),
      CODE_TTL_MINUTES
    );

    if let Err(e) = self.gateway.deliver(&user.email, subject, &body).await {
      tracing::warn!(
        user_id = %user.id,
        purpose = %purpose,
        error = %e,
        "code delivery failed (non-fatal), writing fallback record"
      );

      let line = format!("{} code for {}: {}", purpose, user.email, code.as_str());
      if let Err(e) = self.fallback.record(&user.email, &line).await {
        tracing::error!(user_id = %user.id, error = %e, "fallback record failed");
      }
    }

    Ok(())
  }
}
