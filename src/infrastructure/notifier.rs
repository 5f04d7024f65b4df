use crate::domain::ports::Notifier;
use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Writes rider notifications to the log instead of a mail gateway.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_message(&self, destination: &str, subject: &str, body: &str) -> Result<()> {
        info!(destination, subject, body, "notification sent");
        Ok(())
    }
}
