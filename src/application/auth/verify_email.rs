use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::CredentialService;
use crate::domain::auth::value_objects::Email;

/// Command for verifying an account with an emailed code
#[derive(Debug, Clone)]
pub struct VerifyEmailCommand {
  pub email: String,
  /// The 6-digit code as typed by the user
  pub code: String,
}

/// Response after successful verification
#[derive(Debug, Clone)]
pub struct VerifyEmailResponse {
  pub user_id: Uuid,
  pub email: String,
  pub access_token: String,
  pub expires_at: DateTime<Utc>,
}

/// Use case for email verification
pub struct VerifyEmailUseCase {
  credential_service: Arc<CredentialService>,
}

impl VerifyEmailUseCase {
  pub fn new(credential_service: Arc<CredentialService>) -> Self {
    Self { credential_service }
  }

  /// Executes the verification use case. Idempotent for already-verified
  /// accounts: they receive a fresh token without the code being checked.
  pub async fn execute(&self, command: VerifyEmailCommand) -> Result<VerifyEmailResponse, AuthError> {
    let email = Email::new(command.email)?;

    let (user, token) = self
      .credential_service
      .verify_email(email, &command.code)
      .await?;

    Ok(VerifyEmailResponse {
      user_id: user.id,
      email: user.email,
      access_token: token.token,
      expires_at: token.expires_at,
    })
  }
}
