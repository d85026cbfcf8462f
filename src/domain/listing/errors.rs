use thiserror::Error;
use uuid::Uuid;

use super::value_objects::ValueObjectError;

#[derive(Debug, Error)]
pub enum ListingError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Listing not found: {0}")]
  NotFound(Uuid),

  // Also covers mark-sold attempts on a listing that is already in its
  // terminal state; the API exposes no "unsell".
  #[error("Forbidden")]
  Forbidden,

  #[error("Owner account not found or not verified")]
  OwnerNotEligible,

  #[error("Repository error: {0}")]
  Repository(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum BlobStoreError {
  #[error("Invalid blob reference: {0}")]
  InvalidRef(String),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}
