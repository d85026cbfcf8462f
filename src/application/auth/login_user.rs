use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::CredentialService;
use crate::domain::auth::value_objects::Email;

/// Command for logging in
#[derive(Debug, Clone)]
pub struct LoginUserCommand {
  pub email: String,
  pub password: String,
}

/// Response after successful login
#[derive(Debug, Clone)]
pub struct LoginUserResponse {
  pub user_id: Uuid,
  pub email: String,
  pub access_token: String,
  pub expires_at: DateTime<Utc>,
}

/// Use case for authenticating an account
pub struct LoginUserUseCase {
  credential_service: Arc<CredentialService>,
}

impl LoginUserUseCase {
  pub fn new(credential_service: Arc<CredentialService>) -> Self {
    Self { credential_service }
  }

  /// Executes the login use case.
  ///
  /// A malformed email cannot match an account, so it fails with the same
  /// `InvalidCredentials` as an unknown one.
  pub async fn execute(&self, command: LoginUserCommand) -> Result<LoginUserResponse, AuthError> {
    let email = Email::new(command.email).map_err(|_| AuthError::InvalidCredentials)?;

    let (user, token) = self
      .credential_service
      .login(email, &command.password)
      .await?;

    Ok(LoginUserResponse {
      user_id: user.id,
      email: user.email,
      access_token: token.token,
      expires_at: token.expires_at,
    })
  }
}
