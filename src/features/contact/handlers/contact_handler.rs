use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::contact::dtos::{ContactFormDto, ContactSubmissionDto};
use crate::features::contact::services::ContactService;
use crate::features::rate_limits::ClientIp;
use crate::shared::constants::CONTACT_SUCCESS_MESSAGE;
use crate::shared::types::ApiResponse;
use crate::shared::validation::field_errors;

/// Submit the contact form
///
/// Public endpoint, limited to 5 submissions per 15 minutes per client.
/// Submissions filling a hidden field are acknowledged but dropped.
#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactFormDto,
    responses(
        (status = 200, description = "Message accepted", body = ApiResponse<ContactSubmissionDto>),
        (status = 400, description = "Validation error"),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Delivery failed")
    ),
    tag = "contact"
)]
pub async fn submit_contact_form(
    State(service): State<Arc<ContactService>>,
    ClientIp(client_ip): ClientIp,
    AppJson(dto): AppJson<ContactFormDto>,
) -> Result<Json<ApiResponse<ContactSubmissionDto>>> {
    if dto.is_spam() {
        tracing::info!("Dropping contact submission from {}: honeypot filled", client_ip);
        return Ok(Json(ApiResponse::success(
            Some(ContactSubmissionDto { ok: true }),
            Some(CONTACT_SUCCESS_MESSAGE.to_string()),
            None,
        )));
    }

    dto.validate()
        .map_err(|e| AppError::InvalidFields(field_errors(&e)))?;

    let submission = service.submit(dto, client_ip).await?;
    Ok(Json(ApiResponse::success(
        Some(submission),
        Some(CONTACT_SUCCESS_MESSAGE.to_string()),
        None,
    )))
}
