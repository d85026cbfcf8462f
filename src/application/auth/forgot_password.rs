use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::CredentialService;
use crate::domain::auth::value_objects::Email;

/// Command for requesting a password reset code
#[derive(Debug, Clone)]
pub struct ForgotPasswordCommand {
  pub email: String,
}

/// Use case for issuing a password reset code
pub struct ForgotPasswordUseCase {
  credential_service: Arc<CredentialService>,
}

impl ForgotPasswordUseCase {
  pub fn new(credential_service: Arc<CredentialService>) -> Self {
    Self { credential_service }
  }

  pub async fn execute(&self, command: ForgotPasswordCommand) -> Result<(), AuthError> {
    let email = Email::new(command.email)?;
    self.credential_service.forgot_password(email).await
  }
}
