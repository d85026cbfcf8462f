use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::CredentialService;
use crate::domain::auth::value_objects::{Email, Password};

/// Command for registering a new account
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
  /// Campus email address
  pub email: String,
  /// Plain text password, hashed before storage
  pub password: String,
}

/// Response after successful registration. No token is issued yet; the
/// account stays pending until the emailed code is verified.
#[derive(Debug, Clone)]
pub struct RegisterUserResponse {
  pub user_id: Uuid,
  pub email: String,
}

/// Use case for registering a new account
pub struct RegisterUserUseCase {
  credential_service: Arc<CredentialService>,
}

impl RegisterUserUseCase {
  pub fn new(credential_service: Arc<CredentialService>) -> Self {
    Self { credential_service }
  }

  /// Executes the registration use case
  ///
  /// # Errors
  /// Returns `AuthError` if validation fails, the domain is not the campus
  /// domain, or the email is already registered
  pub async fn execute(
    &self,
    command: RegisterUserCommand,
  ) -> Result<RegisterUserResponse, AuthError> {
    let email = Email::new(command.email)?;
    let password = Password::new(command.password)?;

    let user = self.credential_service.register(email, password).await?;

    Ok(RegisterUserResponse {
      user_id: user.id,
      email: user.email,
    })
  }
}
