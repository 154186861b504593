use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::contact::dtos::{ContactFormDto, ContactSubmissionDto};
use crate::features::contact::models::ContactMessage;
use crate::features::contact::services::ContactNotifier;

/// Service accepting contact form submissions
pub struct ContactService {
    notifier: Arc<dyn ContactNotifier>,
}

impl ContactService {
    pub fn new(notifier: Arc<dyn ContactNotifier>) -> Self {
        Self { notifier }
    }

    /// Deliver a validated submission
    pub async fn submit(
        &self,
        dto: ContactFormDto,
        client_ip: String,
    ) -> Result<ContactSubmissionDto> {
        let message = ContactMessage::from_form(dto, client_ip);

        self.notifier.deliver(&message).await.map_err(|e| {
            tracing::error!("Failed to deliver contact message {}: {:?}", message.id, e);
            AppError::Internal(format!("Contact delivery failed: {}", e))
        })?;

        tracing::info!("Contact message delivered: id={}", message.id);
        Ok(ContactSubmissionDto { ok: true })
    }
}
