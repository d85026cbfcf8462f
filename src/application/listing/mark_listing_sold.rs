use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::listing::errors::ListingError;
use crate::domain::listing::services::ListingService;

/// Command for marking a listing sold
#[derive(Debug, Clone)]
pub struct MarkListingSoldCommand {
  pub listing_id: Uuid,
  /// Authenticated requester; must own the listing
  pub requesting_user_id: Uuid,
}

/// Response after the transition
#[derive(Debug, Clone)]
pub struct MarkListingSoldResponse {
  pub listing_id: Uuid,
  pub sold_at: DateTime<Utc>,
}

/// Use case for the `active -> sold` transition
pub struct MarkListingSoldUseCase {
  listing_service: Arc<ListingService>,
}

impl MarkListingSoldUseCase {
  pub fn new(listing_service: Arc<ListingService>) -> Self {
    Self { listing_service }
  }

  pub async fn execute(
    &self,
    command: MarkListingSoldCommand,
  ) -> Result<MarkListingSoldResponse, ListingError> {
    let listing = self
      .listing_service
      .mark_sold(command.listing_id, command.requesting_user_id)
      .await?;

    // mark_sold always sets sold_at alongside the status
    let sold_at = listing.sold_at.ok_or_else(|| {
      ListingError::Repository("sold listing is missing its sold_at timestamp".to_string())
    })?;

    Ok(MarkListingSoldResponse {
      listing_id: listing.id,
      sold_at,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::User;
  use crate::domain::auth::ports::UserRepository;
  use crate::domain::testing::{
    InMemoryListingRepository, InMemoryUserRepository, RecordingBlobStore, sample_listing_data,
  };

  async fn fixture() -> (MarkListingSoldUseCase, Uuid, Uuid) {
    let listings = Arc::new(InMemoryListingRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let blobs = Arc::new(RecordingBlobStore::new());
    let service = Arc::new(ListingService::new(listings, users.clone(), blobs));

    let mut owner = User::new("owner@school.edu".to_string(), "hash".to_string());
    owner.mark_verified();
    let owner = users.create(owner).await.unwrap();

    let listing = service
      .create_listing(owner.id, sample_listing_data())
      .await
      .unwrap();

    (MarkListingSoldUseCase::new(service), listing.id, owner.id)
  }

  #[tokio::test]
  async fn test_execute_returns_sale_timestamp() {
    let (use_case, listing_id, owner_id) = fixture().await;

    let response = use_case
      .execute(MarkListingSoldCommand {
        listing_id,
        requesting_user_id: owner_id,
      })
      .await
      .unwrap();

    assert_eq!(response.listing_id, listing_id);
  }

  #[tokio::test]
  async fn test_execute_rejects_repeat_sale() {
    let (use_case, listing_id, owner_id) = fixture().await;
    let command = MarkListingSoldCommand {
      listing_id,
      requesting_user_id: owner_id,
    };

    use_case.execute(command.clone()).await.unwrap();
    let result = use_case.execute(command).await;

    assert!(matches!(result, Err(ListingError::Forbidden)));
  }
}
