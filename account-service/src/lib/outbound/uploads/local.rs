use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::media::ImageStore;
use crate::domain::media::ImageStoreError;
use crate::domain::media::ImageUpload;

/// Writes images to a local directory served under `/uploads`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    dir: PathBuf,
    public_prefix: String,
}

impl LocalImageStore {
    pub const PUBLIC_PREFIX: &'static str = "/uploads";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: Self::PUBLIC_PREFIX.to_string(),
        }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, upload: ImageUpload) -> Result<String, ImageStoreError> {
        upload.validate()?;

        let file_name = format!("{}.{}", Uuid::new_v4(), upload.extension()?);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ImageStoreError::WriteFailed(e.to_string()))?;
        tokio::fs::write(self.dir.join(&file_name), &upload.bytes)
            .await
            .map_err(|e| ImageStoreError::WriteFailed(e.to_string()))?;

        tracing::debug!(file = %file_name, bytes = upload.bytes.len(), "Image stored");

        Ok(format!("{}/{}", self.public_prefix, file_name))
    }
}
