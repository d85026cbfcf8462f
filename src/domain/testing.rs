//! In-memory fakes shared by the domain service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::domain::auth::entities::{CodePurpose, OneTimeCode, User};
use crate::domain::auth::errors::{AuthError, RepositoryError};
use crate::domain::auth::ports::{
  AccessToken, OneTimeCodeRepository, TokenClaims, TokenIssuer, UserRepository,
};
use crate::domain::auth::value_objects::Email;
use crate::domain::listing::entities::Listing;
use crate::domain::listing::errors::{BlobStoreError, ListingError};
use crate::domain::listing::ports::{BlobStore, ListingRepository};
use crate::domain::listing::services::ListingData;
use crate::domain::listing::value_objects::{
  ContactMethod, ContactValue, ImageRef, ListingDescription, ListingStatus, ListingTitle, Price,
};
use crate::domain::notification::{DeliveryFallback, NotificationError, NotificationGateway};

// ============================================================================
// Auth fakes
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
  users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let mut users = self.users.lock().unwrap();
    if users.iter().any(|u| u.email == user.email) {
      return Err(AuthError::Repository(RepositoryError::DuplicateKey(
        user.email.clone(),
      )));
    }
    users.push(user.clone());
    Ok(user)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    let users = self.users.lock().unwrap();
    Ok(users.iter().find(|u| u.id == id).cloned())
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let users = self.users.lock().unwrap();
    Ok(users.iter().find(|u| u.email == email.as_str()).cloned())
  }

  async fn update(&self, user: User) -> Result<User, AuthError> {
    let mut users = self.users.lock().unwrap();
    match users.iter_mut().find(|u| u.id == user.id) {
      Some(stored) => {
        *stored = user.clone();
        Ok(user)
      }
      None => Err(AuthError::Repository(RepositoryError::NotFound)),
    }
  }
}

#[derive(Default)]
pub struct InMemoryOneTimeCodeRepository {
  codes: Mutex<Vec<OneTimeCode>>,
}

impl InMemoryOneTimeCodeRepository {
  pub fn new() -> Self {
    Self::default()
  }

  /// Backdates the latest code for (user, purpose), as if it had been
  /// issued `age` ago. Lets tests cross the expiry boundary without
  /// sleeping.
  pub fn age_latest(&self, user_id: Uuid, purpose: CodePurpose, age: Duration) {
    let mut codes = self.codes.lock().unwrap();
    if let Some(code) = codes
      .iter_mut()
      .filter(|c| c.user_id == user_id && c.purpose == purpose)
      .max_by_key(|c| c.created_at)
    {
      code.created_at -= age;
      code.expires_at -= age;
    }
  }
}

#[async_trait]
impl OneTimeCodeRepository for InMemoryOneTimeCodeRepository {
  async fn create(&self, code: OneTimeCode) -> Result<OneTimeCode, AuthError> {
    self.codes.lock().unwrap().push(code.clone());
    Ok(code)
  }

  async fn find_latest(
    &self,
    user_id: Uuid,
    purpose: CodePurpose,
  ) -> Result<Option<OneTimeCode>, AuthError> {
    let codes = self.codes.lock().unwrap();
    Ok(
      codes
        .iter()
        .filter(|c| c.user_id == user_id && c.purpose == purpose)
        .max_by_key(|c| c.created_at)
        .cloned(),
    )
  }

  async fn delete_for_user(&self, user_id: Uuid, purpose: CodePurpose) -> Result<(), AuthError> {
    self
      .codes
      .lock()
      .unwrap()
      .retain(|c| !(c.user_id == user_id && c.purpose == purpose));
    Ok(())
  }
}

/// Unsigned stub issuer; the token is `user_id:email` in the clear
struct StubTokenIssuer;

impl TokenIssuer for StubTokenIssuer {
  fn issue(&self, user_id: Uuid, email: &str) -> Result<AccessToken, AuthError> {
    Ok(AccessToken {
      token: format!("{user_id}:{email}"),
      expires_at: Utc::now() + Duration::days(7),
    })
  }

  fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
    let (user_id, email) = token.split_once(':').ok_or(AuthError::InvalidToken)?;
    let user_id = user_id.parse().map_err(|_| AuthError::InvalidToken)?;
    Ok(TokenClaims {
      user_id,
      email: email.to_string(),
    })
  }
}

pub fn test_token_issuer() -> std::sync::Arc<dyn TokenIssuer> {
  std::sync::Arc::new(StubTokenIssuer)
}

// ============================================================================
// Notification fakes
// ============================================================================

/// Records deliveries; `fail_next` makes the next delivery fail once
#[derive(Default)]
pub struct RecordingGateway {
  deliveries: Mutex<Vec<(String, String, String)>>,
  fail_next: AtomicBool,
}

impl RecordingGateway {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn deliveries(&self) -> Vec<(String, String, String)> {
    self.deliveries.lock().unwrap().clone()
  }

  pub fn fail_next(&self) {
    self.fail_next.store(true, Ordering::SeqCst);
  }

  /// Extracts the 6-digit code from the most recent delivery body
  pub fn last_code(&self) -> Option<String> {
    let deliveries = self.deliveries.lock().unwrap();
    let (_, _, body) = deliveries.last()?;
    let digits: Vec<char> = body.chars().collect();
    digits
      .windows(6)
      .find(|w| w.iter().all(|c| c.is_ascii_digit()))
      .map(|w| w.iter().collect())
  }
}

#[async_trait]
impl NotificationGateway for RecordingGateway {
  async fn deliver(
    &self,
    address: &str,
    subject: &str,
    body: &str,
  ) -> Result<(), NotificationError> {
    if self.fail_next.swap(false, Ordering::SeqCst) {
      return Err(NotificationError::DeliveryFailed("induced failure".into()));
    }
    self.deliveries.lock().unwrap().push((
      address.to_string(),
      subject.to_string(),
      body.to_string(),
    ));
    Ok(())
  }
}

pub struct FailingGateway;

#[async_trait]
impl NotificationGateway for FailingGateway {
  async fn deliver(&self, _: &str, _: &str, _: &str) -> Result<(), NotificationError> {
    Err(NotificationError::DeliveryFailed("provider down".into()))
  }
}

#[derive(Default)]
pub struct RecordingFallback {
  records: Mutex<Vec<(String, String)>>,
}

impl RecordingFallback {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn records(&self) -> Vec<(String, String)> {
    self.records.lock().unwrap().clone()
  }
}

#[async_trait]
impl DeliveryFallback for RecordingFallback {
  async fn record(&self, address: &str, body: &str) -> Result<(), NotificationError> {
    self
      .records
      .lock()
      .unwrap()
      .push((address.to_string(), body.to_string()));
    Ok(())
  }
}

// ============================================================================
// Listing fakes
// ============================================================================

/// `fail_next` makes the next candidate query fail once, as a store error
/// would
#[derive(Default)]
pub struct InMemoryListingRepository {
  listings: Mutex<Vec<Listing>>,
  fail_next: AtomicBool,
}

impl InMemoryListingRepository {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn fail_next(&self) {
    self.fail_next.store(true, Ordering::SeqCst);
  }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
  async fn create(&self, listing: Listing) -> Result<Listing, ListingError> {
    self.listings.lock().unwrap().push(listing.clone());
    Ok(listing)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, ListingError> {
    let listings = self.listings.lock().unwrap();
    Ok(listings.iter().find(|l| l.id == id).cloned())
  }

  async fn find_all(&self) -> Result<Vec<Listing>, ListingError> {
    let mut all: Vec<Listing> = self.listings.lock().unwrap().clone();
    all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(all)
  }

  async fn find_by_owner(&self, owner_user_id: Uuid) -> Result<Vec<Listing>, ListingError> {
    let mut owned: Vec<Listing> = self
      .listings
      .lock()
      .unwrap()
      .iter()
      .filter(|l| l.owner_user_id == owner_user_id)
      .cloned()
      .collect();
    owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(owned)
  }

  async fn update(&self, listing: Listing) -> Result<Listing, ListingError> {
    let mut listings = self.listings.lock().unwrap();
    match listings.iter_mut().find(|l| l.id == listing.id) {
      Some(stored) => {
        *stored = listing.clone();
        Ok(listing)
      }
      None => Err(ListingError::NotFound(listing.id)),
    }
  }

  async fn delete(&self, id: Uuid) -> Result<bool, ListingError> {
    let mut listings = self.listings.lock().unwrap();
    let before = listings.len();
    listings.retain(|l| l.id != id);
    Ok(listings.len() < before)
  }

  async fn find_warn_candidates(
    &self,
    created_before: DateTime<Utc>,
    created_after: DateTime<Utc>,
  ) -> Result<Vec<Listing>, ListingError> {
    if self.fail_next.swap(false, Ordering::SeqCst) {
      return Err(ListingError::Repository("induced failure".into()));
    }
    let listings = self.listings.lock().unwrap();
    Ok(
      listings
        .iter()
        .filter(|l| {
          l.status == ListingStatus::Active
            && l.expiry_warned_at.is_none()
            && l.created_at <= created_before
            && l.created_at > created_after
        })
        .cloned()
        .collect(),
    )
  }

  async fn find_sold_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Listing>, ListingError> {
    let listings = self.listings.lock().unwrap();
    Ok(
      listings
        .iter()
        .filter(|l| l.status == ListingStatus::Sold && l.sold_at.is_some_and(|at| at <= cutoff))
        .cloned()
        .collect(),
    )
  }

  async fn find_active_created_before(
    &self,
    cutoff: DateTime<Utc>,
  ) -> Result<Vec<Listing>, ListingError> {
    let listings = self.listings.lock().unwrap();
    Ok(
      listings
        .iter()
        .filter(|l| l.status == ListingStatus::Active && l.created_at <= cutoff)
        .cloned()
        .collect(),
    )
  }
}

/// Records stores and deletes; `fail_next` makes the next delete fail once
#[derive(Default)]
pub struct RecordingBlobStore {
  stored: Mutex<Vec<String>>,
  deleted: Mutex<Vec<String>>,
  fail_next: AtomicBool,
}

impl RecordingBlobStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn deleted(&self) -> Vec<String> {
    self.deleted.lock().unwrap().clone()
  }

  pub fn fail_next(&self) {
    self.fail_next.store(true, Ordering::SeqCst);
  }
}

#[async_trait]
impl BlobStore for RecordingBlobStore {
  async fn store(&self, name: &str, _bytes: &[u8]) -> Result<(), BlobStoreError> {
    self.stored.lock().unwrap().push(name.to_string());
    Ok(())
  }

  async fn delete(&self, name: &str) -> Result<(), BlobStoreError> {
    if self.fail_next.swap(false, Ordering::SeqCst) {
      return Err(BlobStoreError::InvalidRef("induced failure".into()));
    }
    self.deleted.lock().unwrap().push(name.to_string());
    Ok(())
  }
}

// ============================================================================
// Sample data
// ============================================================================

pub fn sample_listing_data() -> ListingData {
  ListingData {
    title: ListingTitle::new("Mini fridge").unwrap(),
    description: ListingDescription::new("Dorm sized, barely used").unwrap(),
    price: Price::new(dec!(40)).unwrap(),
    image_ref: ImageRef::new("fridge.jpg").unwrap(),
    contact_method: ContactMethod::Phone,
    contact_value: ContactValue::new("5551234567").unwrap(),
  }
}

pub fn sample_listing(owner_user_id: Uuid) -> Listing {
  let data = sample_listing_data();
  Listing::new(
    owner_user_id,
    data.title,
    data.description,
    data.price,
    data.image_ref,
    data.contact_method,
    data.contact_value,
  )
}
