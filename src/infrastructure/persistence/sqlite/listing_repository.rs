use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::listing::{
  entities::Listing,
  errors::ListingError,
  ports::ListingRepository,
  value_objects::{ContactMethod, ListingStatus},
};

const LISTING_COLUMNS: &str = "id, owner_user_id, title, description, price, image_ref, \
                               contact_method, contact_value, status, created_at, sold_at, \
                               expiry_warned_at";

/// SQLite implementation of the ListingRepository trait.
///
/// Uuids and prices travel as TEXT; SQLite has no native decimal type and
/// prices must not pass through floating point.
pub struct SqliteListingRepository {
  pool: SqlitePool,
}

impl SqliteListingRepository {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct ListingRow {
  id: String,
  owner_user_id: String,
  title: String,
  description: String,
  price: String,
  image_ref: String,
  contact_method: String,
  contact_value: String,
  status: String,
  created_at: DateTime<Utc>,
  sold_at: Option<DateTime<Utc>>,
  expiry_warned_at: Option<DateTime<Utc>>,
}

impl TryFrom<ListingRow> for Listing {
  type Error = ListingError;

  fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
    let repo_err = |e: String| ListingError::Repository(e);

    let id = Uuid::parse_str(&row.id).map_err(|e| repo_err(e.to_string()))?;
    let owner_user_id =
      Uuid::parse_str(&row.owner_user_id).map_err(|e| repo_err(e.to_string()))?;
    let price = Decimal::from_str(&row.price).map_err(|e| repo_err(e.to_string()))?;
    let contact_method =
      ContactMethod::from_str(&row.contact_method).map_err(|e| repo_err(e.to_string()))?;
    let status = ListingStatus::from_str(&row.status).map_err(|e| repo_err(e.to_string()))?;

    Ok(Listing::from_db(
      id,
      owner_user_id,
      row.title,
      row.description,
      price,
      row.image_ref,
      contact_method,
      row.contact_value,
      status,
      row.created_at,
      row.sold_at,
      row.expiry_warned_at,
    ))
  }
}

fn rows_to_listings(rows: Vec<ListingRow>) -> Result<Vec<Listing>, ListingError> {
  rows.into_iter().map(Listing::try_from).collect()
}

#[async_trait]
impl ListingRepository for SqliteListingRepository {
  async fn create(&self, listing: Listing) -> Result<Listing, ListingError> {
    let row = sqlx::query_as::<_, ListingRow>(&format!(
      "INSERT INTO listings ({LISTING_COLUMNS}) \
       VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
       RETURNING {LISTING_COLUMNS}"
    ))
    .bind(listing.id.to_string())
    .bind(listing.owner_user_id.to_string())
    .bind(&listing.title)
    .bind(&listing.description)
    .bind(listing.price.to_string())
    .bind(&listing.image_ref)
    .bind(listing.contact_method.as_str())
    .bind(&listing.contact_value)
    .bind(listing.status.as_str())
    .bind(listing.created_at)
    .bind(listing.sold_at)
    .bind(listing.expiry_warned_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, ListingError> {
    let row = sqlx::query_as::<_, ListingRow>(&format!(
      "SELECT {LISTING_COLUMNS} FROM listings WHERE id = ?"
    ))
    .bind(id.to_string())
    .fetch_optional(&self.pool)
    .await?;

    row.map(Listing::try_from).transpose()
  }

  async fn find_all(&self) -> Result<Vec<Listing>, ListingError> {
    let rows = sqlx::query_as::<_, ListingRow>(&format!(
      "SELECT {LISTING_COLUMNS} FROM listings ORDER BY created_at DESC"
    ))
    .fetch_all(&self.pool)
    .await?;

    rows_to_listings(rows)
  }

  async fn find_by_owner(&self, owner_user_id: Uuid) -> Result<Vec<Listing>, ListingError> {
    let rows = sqlx::query_as::<_, ListingRow>(&format!(
      "SELECT {LISTING_COLUMNS} FROM listings \
       WHERE owner_user_id = ? ORDER BY created_at DESC"
    ))
    .bind(owner_user_id.to_string())
    .fetch_all(&self.pool)
    .await?;

    rows_to_listings(rows)
  }

  async fn update(&self, listing: Listing) -> Result<Listing, ListingError> {
    let result = sqlx::query_as::<_, ListingRow>(&format!(
      "UPDATE listings \
       SET title = ?, description = ?, price = ?, image_ref = ?, contact_method = ?, \
           contact_value = ?, status = ?, sold_at = ?, expiry_warned_at = ? \
       WHERE id = ? \
       RETURNING {LISTING_COLUMNS}"
    ))
    .bind(&listing.title)
    .bind(&listing.description)
    .bind(listing.price.to_string())
    .bind(&listing.image_ref)
    .bind(listing.contact_method.as_str())
    .bind(&listing.contact_value)
    .bind(listing.status.as_str())
    .bind(listing.sold_at)
    .bind(listing.expiry_warned_at)
    .bind(listing.id.to_string())
    .fetch_one(&self.pool)
    .await;

    match result {
      Ok(row) => row.try_into(),
      Err(sqlx::Error::RowNotFound) => Err(ListingError::NotFound(listing.id)),
      Err(e) => Err(e.into()),
    }
  }

  async fn delete(&self, id: Uuid) -> Result<bool, ListingError> {
    let result = sqlx::query("DELETE FROM listings WHERE id = ?")
      .bind(id.to_string())
      .execute(&self.pool)
      .await?;

    Ok(result.rows_affected() > 0)
  }

  async fn find_warn_candidates(
    &self,
    created_before: DateTime<Utc>,
    created_after: DateTime<Utc>,
  ) -> Result<Vec<Listing>, ListingError> {
    let rows = sqlx::query_as::<_, ListingRow>(&format!(
      "SELECT {LISTING_COLUMNS} FROM listings \
       WHERE status = 'active' \
         AND expiry_warned_at IS NULL \
         AND created_at <= ? \
         AND created_at > ?"
    ))
    .bind(created_before)
    .bind(created_after)
    .fetch_all(&self.pool)
    .await?;

    rows_to_listings(rows)
  }

  async fn find_sold_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Listing>, ListingError> {
    let rows = sqlx::query_as::<_, ListingRow>(&format!(
      "SELECT {LISTING_COLUMNS} FROM listings \
       WHERE status = 'sold' AND sold_at IS NOT NULL AND sold_at <= ?"
    ))
    .bind(cutoff)
    .fetch_all(&self.pool)
    .await?;

    rows_to_listings(rows)
  }

  async fn find_active_created_before(
    &self,
    cutoff: DateTime<Utc>,
  ) -> Result<Vec<Listing>, ListingError> {
    let rows = sqlx::query_as::<_, ListingRow>(&format!(
      "SELECT {LISTING_COLUMNS} FROM listings \
       WHERE status = 'active' AND created_at <= ?"
    ))
    .bind(cutoff)
    .fetch_all(&self.pool)
    .await?;

    rows_to_listings(rows)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::listing::value_objects::{
    ContactValue, ImageRef, ListingDescription, ListingTitle, Price,
  };
  use crate::infrastructure::persistence::sqlite::test_pool;
  use chrono::Duration;
  use rust_decimal_macros::dec;

  fn listing(owner: Uuid) -> Listing {
    Listing::new(
      owner,
      ListingTitle::new("Textbook bundle").unwrap(),
      ListingDescription::new("Intro econ, like new").unwrap(),
      Price::new(dec!(25.50)).unwrap(),
      ImageRef::new("books.jpg").unwrap(),
      ContactMethod::Email,
      ContactValue::new("seller@school.edu").unwrap(),
    )
  }

  #[tokio::test]
  async fn test_create_round_trips_price_exactly() {
    let pool = test_pool().await;
    let repo = SqliteListingRepository::new(pool);

    let created = repo.create(listing(Uuid::new_v4())).await.unwrap();
    let found = repo.find_by_id(created.id).await.unwrap().unwrap();

    assert_eq!(found.price, dec!(25.50));
    assert_eq!(found.status, ListingStatus::Active);
    assert_eq!(found.contact_method, ContactMethod::Email);
    assert!(found.sold_at.is_none());
  }

  #[tokio::test]
  async fn test_find_all_orders_newest_first() {
    let pool = test_pool().await;
    let repo = SqliteListingRepository::new(pool);
    let owner = Uuid::new_v4();

    let mut older = listing(owner);
    older.created_at -= Duration::hours(2);
    let older = repo.create(older).await.unwrap();
    let newer = repo.create(listing(owner)).await.unwrap();

    let all = repo.find_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, newer.id);
    assert_eq!(all[1].id, older.id);
  }

  #[tokio::test]
  async fn test_find_by_owner_filters() {
    let pool = test_pool().await;
    let repo = SqliteListingRepository::new(pool);
    let owner = Uuid::new_v4();

    repo.create(listing(owner)).await.unwrap();
    repo.create(listing(Uuid::new_v4())).await.unwrap();

    let owned = repo.find_by_owner(owner).await.unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].owner_user_id, owner);
  }

  #[tokio::test]
  async fn test_update_persists_sale() {
    let pool = test_pool().await;
    let repo = SqliteListingRepository::new(pool);

    let mut created = repo.create(listing(Uuid::new_v4())).await.unwrap();
    created.mark_sold();
    repo.update(created.clone()).await.unwrap();

    let found = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.status, ListingStatus::Sold);
    assert!(found.sold_at.is_some());
  }

  #[tokio::test]
  async fn test_delete_reports_whether_a_row_existed() {
    let pool = test_pool().await;
    let repo = SqliteListingRepository::new(pool);

    let created = repo.create(listing(Uuid::new_v4())).await.unwrap();

    assert!(repo.delete(created.id).await.unwrap());
    assert!(!repo.delete(created.id).await.unwrap());
    assert!(repo.find_by_id(created.id).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_warn_candidates_window_and_guard() {
    let pool = test_pool().await;
    let repo = SqliteListingRepository::new(pool);
    let now = Utc::now();

    // In the window
    let mut in_window = listing(Uuid::new_v4());
    in_window.created_at = now - Duration::days(29) - Duration::hours(1);
    let in_window = repo.create(in_window).await.unwrap();

    // Too fresh
    let mut fresh = listing(Uuid::new_v4());
    fresh.created_at = now - Duration::days(10);
    repo.create(fresh).await.unwrap();

    // In the window but already warned
    let mut warned = listing(Uuid::new_v4());
    warned.created_at = now - Duration::days(29) - Duration::hours(1);
    warned.expiry_warned_at = Some(now - Duration::hours(1));
    repo.create(warned).await.unwrap();

    // In the window but sold
    let mut sold = listing(Uuid::new_v4());
    sold.created_at = now - Duration::days(29) - Duration::hours(1);
    sold.mark_sold();
    repo.create(sold).await.unwrap();

    let candidates = repo
      .find_warn_candidates(now - Duration::days(29), now - Duration::days(30))
      .await
      .unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id, in_window.id);
  }

  #[tokio::test]
  async fn test_sold_and_expired_selection() {
    let pool = test_pool().await;
    let repo = SqliteListingRepository::new(pool);
    let now = Utc::now();

    let mut stale_sold = listing(Uuid::new_v4());
    stale_sold.status = ListingStatus::Sold;
    stale_sold.sold_at = Some(now - Duration::days(8));
    let stale_sold = repo.create(stale_sold).await.unwrap();

    let mut fresh_sold = listing(Uuid::new_v4());
    fresh_sold.status = ListingStatus::Sold;
    fresh_sold.sold_at = Some(now - Duration::days(2));
    repo.create(fresh_sold).await.unwrap();

    let mut expired = listing(Uuid::new_v4());
    expired.created_at = now - Duration::days(31);
    let expired = repo.create(expired).await.unwrap();

    let sold = repo.find_sold_before(now - Duration::days(7)).await.unwrap();
    assert_eq!(sold.len(), 1);
    assert_eq!(sold[0].id, stale_sold.id);

    let old_active = repo
      .find_active_created_before(now - Duration::days(30))
      .await
      .unwrap();
    assert_eq!(old_active.len(), 1);
    assert_eq!(old_active[0].id, expired.id);
  }
}
