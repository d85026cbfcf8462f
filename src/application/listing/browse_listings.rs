use std::sync::Arc;
use uuid::Uuid;

use crate::domain::listing::entities::Listing;
use crate::domain::listing::errors::ListingError;
use crate::domain::listing::services::ListingService;

/// Command for browsing listings. With an owner filter the result is the
/// caller's own listings; without one it is the public feed.
#[derive(Debug, Clone, Default)]
pub struct BrowseListingsCommand {
  pub owner_user_id: Option<Uuid>,
}

/// Use case for the read-only browse surface
pub struct BrowseListingsUseCase {
  listing_service: Arc<ListingService>,
}

impl BrowseListingsUseCase {
  pub fn new(listing_service: Arc<ListingService>) -> Self {
    Self { listing_service }
  }

  /// Returns listings newest first
  pub async fn execute(&self, command: BrowseListingsCommand) -> Result<Vec<Listing>, ListingError> {
    match command.owner_user_id {
      Some(owner) => self.listing_service.list_for_owner(owner).await,
      None => self.listing_service.list_all().await,
    }
  }
}
