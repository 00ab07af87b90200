use async_trait::async_trait;
use thiserror::Error;

/// Raw image bytes received from a client.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

impl ImageUpload {
    /// File extension for the content type, e.g. `image/png` -> `png`.
    ///
    /// Only raster formats browsers render inertly are accepted.
    pub fn extension(&self) -> Result<&'static str, ImageStoreError> {
        match self.content_type.trim().to_ascii_lowercase().as_str() {
            "image/png" => Ok("png"),
            "image/jpeg" | "image/jpg" => Ok("jpg"),
            "image/gif" => Ok("gif"),
            "image/webp" => Ok("webp"),
            _ => Err(ImageStoreError::UnsupportedContentType(
                self.content_type.clone(),
            )),
        }
    }

    /// Validate an upload before it reaches storage.
    ///
    /// # Errors
    /// * `Empty` - No bytes
    /// * `UnsupportedContentType` - Not png, jpeg, gif or webp
    pub fn validate(&self) -> Result<(), ImageStoreError> {
        if self.bytes.is_empty() {
            return Err(ImageStoreError::Empty);
        }
        self.extension().map(|_| ())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageStoreError {
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Image is empty")]
    Empty,

    #[error("Failed to store image: {0}")]
    WriteFailed(String),
}

/// Opaque image storage: takes bytes, hands back a reference.
#[async_trait]
pub trait ImageStore: Send + Sync + 'static {
    /// Store an image and return a reference clients can fetch it by.
    ///
    /// # Errors
    /// * `UnsupportedContentType` - Not png, jpeg, gif or webp
    /// * `Empty` - No bytes
    /// * `WriteFailed` - Storage backend failed
    async fn store(&self, upload: ImageUpload) -> Result<String, ImageStoreError>;
}
