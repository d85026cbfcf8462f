use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

use crate::domain::notification::{DeliveryFallback, NotificationError};

/// Append-only log file implementation of the DeliveryFallback trait.
/// Each undeliverable message becomes one timestamped line an operator
/// can grep for.
pub struct FileDeliveryFallback {
  path: PathBuf,
}

impl FileDeliveryFallback {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }
}

#[async_trait]
impl DeliveryFallback for FileDeliveryFallback {
  async fn record(&self, address: &str, body: &str) -> Result<(), NotificationError> {
    if let Some(parent) = self.path.parent() {
      tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| NotificationError::DeliveryFailed(e.to_string()))?;
    }

    let line = format!("[{}] to={} {}\n", Utc::now().to_rfc3339(), address, body);

    let mut file = tokio::fs::OpenOptions::new()
      .create(true)
      .append(true)
      .open(&self.path)
      .await
      .map_err(|e| NotificationError::DeliveryFailed(e.to_string()))?;

    file
      .write_all(line.as_bytes())
      .await
      .map_err(|e| NotificationError::DeliveryFailed(e.to_string()))?;

    Ok(())
  }
}
