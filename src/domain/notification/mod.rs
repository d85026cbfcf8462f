use async_trait::async_trait;
use thiserror::Error;

/// Errors from best-effort delivery collaborators. These are always
/// non-fatal for the primary operation that triggered them; the service
/// applies a log-and-continue policy at its own boundary.
#[derive(Debug, Error)]
pub enum NotificationError {
  #[error("Notification provider is not configured")]
  NotConfigured,

  #[error("Delivery failed: {0}")]
  DeliveryFailed(String),
}

/// Best-effort delivery of a short text message to an address.
/// May fail; callers must never treat a failure as fatal.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
  async fn deliver(&self, address: &str, subject: &str, body: &str)
  -> Result<(), NotificationError>;
}

/// Durable local record of a message that could not be delivered, so an
/// operator can recover it. This is the only place a one-time code's
/// plaintext is ever persisted, and only in the delivery-failure path.
#[async_trait]
pub trait DeliveryFallback: Send + Sync {
  async fn record(&self, address: &str, body: &str) -> Result<(), NotificationError>;
}
