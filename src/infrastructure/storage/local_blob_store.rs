use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::listing::errors::BlobStoreError;
use crate::domain::listing::ports::BlobStore;

/// Filesystem implementation of the BlobStore trait. Blobs live as flat
/// files under one uploads directory; names must not address anything
/// outside it.
pub struct LocalBlobStore {
  root: PathBuf,
}

impl LocalBlobStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  fn resolve(&self, name: &str) -> Result<PathBuf, BlobStoreError> {
    if name.is_empty()
      || name.contains('/')
      || name.contains('\\')
      || name.contains("..")
      || Path::new(name).is_absolute()
    {
      return Err(BlobStoreError::InvalidRef(name.to_string()));
    }
    Ok(self.root.join(name))
  }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
  async fn store(&self, name: &str, bytes: &[u8]) -> Result<(), BlobStoreError> {
    let path = self.resolve(name)?;
    tokio::fs::create_dir_all(&self.root).await?;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
  }

  async fn delete(&self, name: &str) -> Result<(), BlobStoreError> {
    let path = self.resolve(name)?;
    match tokio::fs::remove_file(&path).await {
      Ok(()) => Ok(()),
      // Already gone means the desired state is reached
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}
