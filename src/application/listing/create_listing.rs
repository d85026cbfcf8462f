use chrono::{DateTime, Utc};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::listing::errors::ListingError;
use crate::domain::listing::services::{ListingData, ListingService};
use crate::domain::listing::value_objects::{
  ContactMethod, ContactValue, ImageRef, ListingDescription, ListingTitle, Price,
};

/// Command for creating a listing
#[derive(Debug, Clone)]
pub struct CreateListingCommand {
  /// Authenticated owner; must belong to a verified account
  pub owner_user_id: Uuid,
  pub title: String,
  pub description: String,
  /// Decimal string, e.g. "25.50"
  pub price: String,
  /// Blob name of the already-uploaded image
  pub image_ref: String,
  /// "email", "phone" or "instagram"
  pub contact_method: String,
  pub contact_value: String,
}

/// Response after successful creation
#[derive(Debug, Clone)]
pub struct CreateListingResponse {
  pub listing_id: Uuid,
  pub created_at: DateTime<Utc>,
}

/// Use case for creating a listing
pub struct CreateListingUseCase {
  listing_service: Arc<ListingService>,
}

impl CreateListingUseCase {
  pub fn new(listing_service: Arc<ListingService>) -> Self {
    Self { listing_service }
  }

  /// Executes the creation use case
  ///
  /// # Errors
  /// `Validation` on any malformed field, `OwnerNotEligible` when the
  /// owner account is missing or unverified
  pub async fn execute(
    &self,
    command: CreateListingCommand,
  ) -> Result<CreateListingResponse, ListingError> {
    let data = ListingData {
      title: ListingTitle::new(command.title)?,
      description: ListingDescription::new(command.description)?,
      price: Price::parse(&command.price)?,
      image_ref: ImageRef::new(command.image_ref)?,
      contact_method: ContactMethod::from_str(&command.contact_method)?,
      contact_value: ContactValue::new(command.contact_value)?,
    };

    let listing = self
      .listing_service
      .create_listing(command.owner_user_id, data)
      .await?;

    Ok(CreateListingResponse {
      listing_id: listing.id,
      created_at: listing.created_at,
    })
  }
}
