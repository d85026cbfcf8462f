use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::UserRepository;

use super::entities::Listing;
use super::errors::ListingError;
use super::ports::{BlobStore, ListingRepository};
use super::value_objects::{
  ContactMethod, ContactValue, ImageRef, ListingDescription, ListingTitle, Price,
};

/// Listing creation data
pub struct ListingData {
  pub title: ListingTitle,
  pub description: ListingDescription,
  pub price: Price,
  pub image_ref: ImageRef,
  pub contact_method: ContactMethod,
  pub contact_value: ContactValue,
}

/// Listing lifecycle service: creation, the `active -> sold` transition and
/// owner-initiated deletion. Time-driven transitions live in the cleanup
/// service.
pub struct ListingService {
  listing_repo: Arc<dyn ListingRepository>,
  user_repo: Arc<dyn UserRepository>,
  blob_store: Arc<dyn BlobStore>,
}

impl ListingService {
  pub fn new(
    listing_repo: Arc<dyn ListingRepository>,
    user_repo: Arc<dyn UserRepository>,
    blob_store: Arc<dyn BlobStore>,
  ) -> Self {
    Self {
      listing_repo,
      user_repo,
      blob_store,
    }
  }

  /// Creates a listing for a verified owner.
  ///
  /// # Errors
  /// `OwnerNotEligible` if the owner account is missing or unverified
  pub async fn create_listing(
    &self,
    owner_user_id: Uuid,
    data: ListingData,
  ) -> Result<Listing, ListingError> {
    let owner = self
      .user_repo
      .find_by_id(owner_user_id)
      .await
      .map_err(|e| ListingError::Repository(e.to_string()))?;

    match owner {
      Some(user) if user.is_verified => {}
      _ => return Err(ListingError::OwnerNotEligible),
    }

    let listing = Listing::new(
      owner_user_id,
      data.title,
      data.description,
      data.price,
      data.image_ref,
      data.contact_method,
      data.contact_value,
    );

    self.listing_repo.create(listing).await
  }

  /// All listings, newest first (public browse surface)
  pub async fn list_all(&self) -> Result<Vec<Listing>, ListingError> {
    self.listing_repo.find_all().await
  }

  /// Listings owned by a user, newest first
  pub async fn list_for_owner(&self, owner_user_id: Uuid) -> Result<Vec<Listing>, ListingError> {
    self.listing_repo.find_by_owner(owner_user_id).await
  }

  /// Marks a listing sold.
  ///
  /// # Errors
  /// - `NotFound` if the listing does not exist
  /// - `Forbidden` unless the requester owns it, or when it is already
  ///   sold: `sold` is terminal and there is no unsell
  pub async fn mark_sold(
    &self,
    listing_id: Uuid,
    requesting_user_id: Uuid,
  ) -> Result<Listing, ListingError> {
    let mut listing = self
      .listing_repo
      .find_by_id(listing_id)
      .await?
      .ok_or(ListingError::NotFound(listing_id))?;

    if !listing.is_owned_by(requesting_user_id) {
      return Err(ListingError::Forbidden);
    }

    if listing.is_sold() {
      return Err(ListingError::Forbidden);
    }

    listing.mark_sold();
    self.listing_repo.update(listing).await
  }

  /// Deletes a listing and its stored image.
  ///
  /// The row deletion is authoritative; the blob deletion is best-effort
  /// and a failure is logged without rolling anything back. A listing the
  /// sweep has already purged is a successful no-op, so an owner delete
  /// racing the purge surfaces no error to either side.
  pub async fn delete_listing(
    &self,
    listing_id: Uuid,
    requesting_user_id: Uuid,
  ) -> Result<(), ListingError> {
    let listing = match self.listing_repo.find_by_id(listing_id).await? {
      Some(listing) => listing,
      None => {
        tracing::debug!(%listing_id, "delete of already-removed listing, treating as no-op");
        return Ok(());
      }
    };

    if !listing.is_owned_by(requesting_user_id) {
      return Err(ListingError::Forbidden);
    }

    self.listing_repo.delete(listing_id).await?;

    if let Err(e) = self.blob_store.delete(&listing.image_ref).await {
      tracing::warn!(
        %listing_id,
        image_ref = %listing.image_ref,
        error = %e,
        "blob deletion failed (non-fatal), row deletion stands"
      );
    }

    Ok(())
  }
}
