use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::features::contact::dtos::ContactFormDto;

/// A validated submission ready for delivery
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub client_ip: String,
    pub received_at: DateTime<Utc>,
}

impl ContactMessage {
    pub fn from_form(dto: ContactFormDto, client_ip: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: dto.name.trim().to_string(),
            email: dto.email.trim().to_string(),
            message: dto.message.trim().to_string(),
            client_ip,
            received_at: Utc::now(),
        }
    }
}
