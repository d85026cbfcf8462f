use std::sync::Arc;
use uuid::Uuid;

use crate::domain::listing::errors::ListingError;
use crate::domain::listing::services::ListingService;

/// Command for deleting a listing
#[derive(Debug, Clone)]
pub struct DeleteListingCommand {
  pub listing_id: Uuid,
  /// Authenticated requester; must own the listing
  pub requesting_user_id: Uuid,
}

/// Use case for owner-initiated deletion. Deleting a listing the sweep has
/// already purged succeeds as a no-op.
pub struct DeleteListingUseCase {
  listing_service: Arc<ListingService>,
}

impl DeleteListingUseCase {
  pub fn new(listing_service: Arc<ListingService>) -> Self {
    Self { listing_service }
  }

  pub async fn execute(&self, command: DeleteListingCommand) -> Result<(), ListingError> {
    self
      .listing_service
      .delete_listing(command.listing_id, command.requesting_user_id)
      .await
  }
}
