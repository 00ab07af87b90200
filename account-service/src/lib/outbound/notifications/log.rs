use async_trait::async_trait;

use crate::domain::notification::Notification;
use crate::domain::notification::NotificationError;
use crate::domain::notification::NotificationSink;

/// Stand-in sink for environments without mail delivery.
///
/// Records that a message would have been sent. The body is never logged
/// since it carries a live token.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl NotificationSink for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        tracing::info!(
            to = %notification.to,
            subject = %notification.subject,
            "Mail delivery disabled; notification not sent"
        );
        Ok(())
    }
}
