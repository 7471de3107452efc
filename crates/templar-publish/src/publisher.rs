use templar_build::Manifest;
use templar_cloud::{Executor, RealExecutor, StorageClient};
use templar_core::Mode;

use crate::error::TemplateError;

/// What the publish stage did with a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Published {
    Uploaded { key: String },
    Skipped,
}

/// Uploads template manifests to the templates bucket.
///
/// Development runs never touch storage.
pub struct Publisher<E: Executor = RealExecutor> {
    storage: StorageClient<E>,
    mode: Mode,
    bucket: Option<String>,
}

impl<E: Executor> Publisher<E> {
    pub fn new(storage: StorageClient<E>, mode: Mode, bucket: Option<String>) -> Self {
        Self {
            storage,
            mode,
            bucket,
        }
    }

    pub fn storage(&self) -> &StorageClient<E> {
        &self.storage
    }

    pub async fn publish(&self, manifest: &Manifest) -> Result<Published, TemplateError> {
        if self.mode.is_development() {
            tracing::info!(
                id = %manifest.id,
                "NOT uploading template config; only production runs publish manifests"
            );
            return Ok(Published::Skipped);
        }

        let bucket = self.bucket.as_deref().ok_or(TemplateError::MissingBucket)?;
        let key = manifest.object_key();
        let body = manifest.to_json().map_err(|e| TemplateError::Serialize {
            id: manifest.id.clone(),
            source: e,
        })?;

        tracing::info!(id = %manifest.id, bucket, %key, "uploading template config");
        self.storage.upload_json(bucket, &key, &body).await?;

        Ok(Published::Uploaded { key })
    }
}
