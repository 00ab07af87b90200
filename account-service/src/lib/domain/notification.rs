use async_trait::async_trait;
use thiserror::Error;

/// An outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    BuildFailed(String),

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Delivery of notifications to account holders.
///
/// Callers treat delivery as best effort: a failure is reported but never
/// undoes state the caller already committed.
#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError>;
}
