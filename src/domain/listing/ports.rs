use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::entities::Listing;
use super::errors::{BlobStoreError, ListingError};

/// Repository trait for listing persistence operations
#[async_trait]
pub trait ListingRepository: Send + Sync {
  /// Creates a new listing
  async fn create(&self, listing: Listing) -> Result<Listing, ListingError>;

  /// Finds a listing by its unique identifier
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, ListingError>;

  /// Returns all listings, newest first
  async fn find_all(&self) -> Result<Vec<Listing>, ListingError>;

  /// Returns listings owned by a user, newest first
  async fn find_by_owner(&self, owner_user_id: Uuid) -> Result<Vec<Listing>, ListingError>;

  /// Persists mutations to an existing listing
  async fn update(&self, listing: Listing) -> Result<Listing, ListingError>;

  /// Deletes a listing row. Returns false when the row was already gone,
  /// which callers treat as a successful no-op.
  async fn delete(&self, id: Uuid) -> Result<bool, ListingError>;

  /// Active listings created inside (older_than, newer_than] that have
  /// never been warned. Used by the sweep's warn pass.
  async fn find_warn_candidates(
    &self,
    created_before: DateTime<Utc>,
    created_after: DateTime<Utc>,
  ) -> Result<Vec<Listing>, ListingError>;

  /// Sold listings whose sold_at is at or before the cutoff
  async fn find_sold_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Listing>, ListingError>;

  /// Active listings created at or before the cutoff
  async fn find_active_created_before(
    &self,
    cutoff: DateTime<Utc>,
  ) -> Result<Vec<Listing>, ListingError>;
}

/// Blob storage by opaque name. Used for listing images.
#[async_trait]
pub trait BlobStore: Send + Sync {
  /// Stores bytes under the given name, overwriting any previous blob
  async fn store(&self, name: &str, bytes: &[u8]) -> Result<(), BlobStoreError>;

  /// Deletes the named blob. Deleting a missing blob is a success no-op.
  async fn delete(&self, name: &str) -> Result<(), BlobStoreError>;
}
