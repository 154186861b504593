use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::contact::models::ContactMessage;

/// Delivery channel for accepted contact messages
#[async_trait]
pub trait ContactNotifier: Send + Sync {
    async fn deliver(&self, message: &ContactMessage) -> Result<()>;
}

/// Records submissions in the application log
pub struct TracingNotifier {
    recipient: Option<String>,
}

impl TracingNotifier {
    pub fn new(recipient: Option<String>) -> Self {
        Self { recipient }
    }
}

#[async_trait]
impl ContactNotifier for TracingNotifier {
    async fn deliver(&self, message: &ContactMessage) -> Result<()> {
        tracing::info!(
            id = %message.id,
            to = self.recipient.as_deref().unwrap_or("-"),
            from = %message.email,
            name = %message.name,
            client_ip = %message.client_ip,
            "Contact message received ({} chars)",
            message.message.chars().count()
        );
        Ok(())
    }
}
