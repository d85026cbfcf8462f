use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::auth::UserRepository;
use crate::domain::listing::entities::Listing;
use crate::domain::listing::errors::ListingError;
use crate::domain::listing::ports::{BlobStore, ListingRepository};
use crate::domain::notification::NotificationGateway;

/// Age thresholds for the periodic sweep, in days
#[derive(Debug, Clone)]
pub struct CleanupPolicy {
  /// Active listings older than this receive an expiry warning
  pub warn_after_days: i64,
  /// Active listings older than this are purged
  pub expire_after_days: i64,
  /// Sold listings are purged this long after the sale
  pub purge_sold_after_days: i64,
}

impl Default for CleanupPolicy {
  fn default() -> Self {
    Self {
      warn_after_days: 29,
      expire_after_days: 30,
      purge_sold_after_days: 7,
    }
  }
}

/// Counts from one sweep
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
  pub warned: usize,
  pub purged_sold: usize,
  pub purged_expired: usize,
}

/// Time-driven listing maintenance. One sweep runs three passes in order:
/// warn soon-to-expire active listings, purge stale sold listings, purge
/// expired active listings.
///
/// Every pass keys off absolute timestamps already in the rows, so a sweep
/// that runs late (or after downtime) converges to the same end state as one
/// that ran on schedule. Re-running a sweep is a no-op.
pub struct CleanupService {
  listing_repo: Arc<dyn ListingRepository>,
  user_repo: Arc<dyn UserRepository>,
  blob_store: Arc<dyn BlobStore>,
  gateway: Arc<dyn NotificationGateway>,
  policy: CleanupPolicy,
}

impl CleanupService {
  pub fn new(
    listing_repo: Arc<dyn ListingRepository>,
    user_repo: Arc<dyn UserRepository>,
    blob_store: Arc<dyn BlobStore>,
    gateway: Arc<dyn NotificationGateway>,
    policy: CleanupPolicy,
  ) -> Self {
    Self {
      listing_repo,
      user_repo,
      blob_store,
      gateway,
      policy,
    }
  }

  /// Runs one full sweep. Candidate queries propagate their errors; per-row
  /// side effects (mail, blob deletion) are logged and never abort the pass.
  pub async fn run_sweep(&self) -> Result<SweepReport, ListingError> {
    let mut report = SweepReport::default();

    report.warned = self.warn_expiring().await?;
    report.purged_sold = self.purge_sold().await?;
    report.purged_expired = self.purge_expired().await?;

    Ok(report)
  }

  /// Warn pass: active listings inside the warning window that have never
  /// been warned. The warned marker is set whether or not the mail went
  /// out, so a listing is warned at most once.
  async fn warn_expiring(&self) -> Result<usize, ListingError> {
    let now = Utc::now();
    let candidates = self
      .listing_repo
      .find_warn_candidates(
        now - Duration::days(self.policy.warn_after_days),
        now - Duration::days(self.policy.expire_after_days),
      )
      .await?;

    let mut warned = 0;
    for mut listing in candidates {
      self.send_expiry_warning(&listing).await;

      listing.record_expiry_warning();
      match self.listing_repo.update(listing).await {
        Ok(_) => warned += 1,
        Err(e) => {
          tracing::warn!(error = %e, "failed to record expiry warning, row will be retried");
        }
      }
    }

    Ok(warned)
  }

  /// Purge pass: sold listings past the retention window
  async fn purge_sold(&self) -> Result<usize, ListingError> {
    let cutoff = Utc::now() - Duration::days(self.policy.purge_sold_after_days);
    let stale = self.listing_repo.find_sold_before(cutoff).await?;

    let mut purged = 0;
    for listing in stale {
      if self.purge_listing(&listing).await? {
        purged += 1;
      }
    }

    Ok(purged)
  }

  /// Purge pass: active listings that aged out without selling
  async fn purge_expired(&self) -> Result<usize, ListingError> {
    let cutoff = Utc::now() - Duration::days(self.policy.expire_after_days);
    let expired = self.listing_repo.find_active_created_before(cutoff).await?;

    let mut purged = 0;
    for listing in expired {
      if self.purge_listing(&listing).await? {
        purged += 1;
      }
    }

    Ok(purged)
  }

  /// Row first, blob second. A row already deleted by a concurrent owner
  /// delete counts as not purged; a blob failure is logged and the purge
  /// still counts.
  async fn purge_listing(&self, listing: &Listing) -> Result<bool, ListingError> {
    if !self.listing_repo.delete(listing.id).await? {
      tracing::debug!(listing_id = %listing.id, "listing already removed, skipping purge");
      return Ok(false);
    }

    if let Err(e) = self.blob_store.delete(&listing.image_ref).await {
      tracing::warn!(
        listing_id = %listing.id,
        image_ref = %listing.image_ref,
        error = %e,
        "blob deletion failed during purge (non-fatal)"
      );
    }

    Ok(true)
  }

  async fn send_expiry_warning(&self, listing: &Listing) {
    let owner = match self.user_repo.find_by_id(listing.owner_user_id).await {
      Ok(Some(owner)) => owner,
      Ok(None) => {
        tracing::warn!(listing_id = %listing.id, "expiring listing has no owner account");
        return;
      }
      Err(e) => {
        tracing::warn!(listing_id = %listing.id, error = %e, "owner lookup failed for warning");
        return;
      }
    };

    let subject = "Your listing expires soon";
    let body = format!(
      "Your listing \"{}\" will expire in about 1 day.\n\n\
       Listings are removed {} days after posting. Mark it sold or repost it \
       if it is still available.",
      listing.title, self.policy.expire_after_days
    );

    if let Err(e) = self.gateway.deliver(&owner.email, subject, &body).await {
      tracing::warn!(
        listing_id = %listing.id,
        error = %e,
        "expiry warning delivery failed (non-fatal)"
      );
    }
  }
}
