use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{
  ContactMethod, ContactValue, ImageRef, ListingDescription, ListingStatus, ListingTitle, Price,
};

/// Listing entity: the core sellable unit.
///
/// Invariants: `sold_at` is non-null iff `status == Sold`;
/// `expiry_warned_at`, once set, is never cleared; exactly one owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
  /// Unique identifier for the listing
  pub id: Uuid,
  /// The user who owns this listing; only they may mutate or delete it
  pub owner_user_id: Uuid,
  pub title: String,
  pub description: String,
  /// Non-negative price
  pub price: Decimal,
  /// Opaque reference into the blob store (required)
  pub image_ref: String,
  pub contact_method: ContactMethod,
  pub contact_value: String,
  pub status: ListingStatus,
  pub created_at: DateTime<Utc>,
  /// Set exactly when the listing is marked sold; never cleared
  pub sold_at: Option<DateTime<Utc>>,
  /// Idempotency guard for the expiry warning; set once, never cleared
  pub expiry_warned_at: Option<DateTime<Utc>>,
}

impl Listing {
  /// Creates a new active listing
  pub fn new(
    owner_user_id: Uuid,
    title: ListingTitle,
    description: ListingDescription,
    price: Price,
    image_ref: ImageRef,
    contact_method: ContactMethod,
    contact_value: ContactValue,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      owner_user_id,
      title: title.into_inner(),
      description: description.into_inner(),
      price: price.amount(),
      image_ref: image_ref.into_inner(),
      contact_method,
      contact_value: contact_value.into_inner(),
      status: ListingStatus::Active,
      created_at: Utc::now(),
      sold_at: None,
      expiry_warned_at: None,
    }
  }

  /// Creates a listing from database fields (for reconstruction)
  #[allow(clippy::too_many_arguments)]
  pub fn from_db(
    id: Uuid,
    owner_user_id: Uuid,
    title: String,
    description: String,
    price: Decimal,
    image_ref: String,
    contact_method: ContactMethod,
    contact_value: String,
    status: ListingStatus,
    created_at: DateTime<Utc>,
    sold_at: Option<DateTime<Utc>>,
    expiry_warned_at: Option<DateTime<Utc>>,
  ) -> Self {
    Self {
      id,
      owner_user_id,
      title,
      description,
      price,
      image_ref,
      contact_method,
      contact_value,
      status,
      created_at,
      sold_at,
      expiry_warned_at,
    }
  }

  pub fn is_sold(&self) -> bool {
    self.status == ListingStatus::Sold
  }

  pub fn is_owned_by(&self, user_id: Uuid) -> bool {
    self.owner_user_id == user_id
  }

  /// Transitions `active -> sold`. There is no transition back.
  pub fn mark_sold(&mut self) {
    self.status = ListingStatus::Sold;
    self.sold_at = Some(Utc::now());
  }

  /// Records that the owner has been warned about upcoming expiry.
  /// Set once; a warned listing is never re-selected by the warn pass.
  pub fn record_expiry_warning(&mut self) {
    if self.expiry_warned_at.is_none() {
      self.expiry_warned_at = Some(Utc::now());
    }
  }
}
