pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{CODE_TTL_MINUTES, CodePurpose, OneTimeCode, User};
pub use errors::{AuthError, RepositoryError};
pub use ports::{AccessToken, OneTimeCodeRepository, TokenClaims, TokenIssuer, UserRepository};
pub use services::{CredentialService, CredentialServiceConfig};
pub use value_objects::{
  CampusDomain, CodeHash, Email, Password, PasswordHash, SecretCode, ValueObjectError,
};
