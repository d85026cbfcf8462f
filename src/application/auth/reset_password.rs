use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::CredentialService;
use crate::domain::auth::value_objects::{Email, Password};

/// Command for completing a password reset
#[derive(Debug, Clone)]
pub struct ResetPasswordCommand {
  pub email: String,
  /// The reset code from the email
  pub code: String,
  pub new_password: String,
}

/// Use case for replacing a password with a valid reset code
pub struct ResetPasswordUseCase {
  credential_service: Arc<CredentialService>,
}

impl ResetPasswordUseCase {
  pub fn new(credential_service: Arc<CredentialService>) -> Self {
    Self { credential_service }
  }

  pub async fn execute(&self, command: ResetPasswordCommand) -> Result<(), AuthError> {
    let email = Email::new(command.email)?;
    let new_password = Password::new(command.new_password)?;

    self
      .credential_service
      .reset_password(email, &command.code, new_password)
      .await
  }
}
