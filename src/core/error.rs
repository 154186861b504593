use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::modules::cms::CmsError;
use crate::shared::templates::TemplateError;
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid payload: {0:?}")]
    InvalidFields(Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// A remote delivery channel (the mail server) failed
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("CMS error: {0}")]
    Cms(#[from] CmsError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Rate limit exceeded, retry after {retry_after}s")]
    RateLimitExceeded {
        retry_after: u64,
        limit: u32,
        reset_time: i64,
    },
}

/// Body payload of a 429 response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetryAfterBody {
    retry_after: u64,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::InvalidFields(ref fields) => (
                StatusCode::BAD_REQUEST,
                "Invalid payload".to_string(),
                Some(fields.clone()),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while processing your request. Please try again later."
                        .to_string(),
                    None,
                )
            }
            AppError::ExternalServiceError(ref msg) => {
                tracing::error!("External service error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone(), None)
            }
            AppError::Cms(ref e) => {
                if e.is_empty_response() {
                    (StatusCode::NOT_FOUND, e.to_string(), None)
                } else {
                    tracing::error!("CMS error: {}", e);
                    (
                        StatusCode::BAD_GATEWAY,
                        "Content is temporarily unavailable".to_string(),
                        None,
                    )
                }
            }
            AppError::Template(ref e) => {
                tracing::error!("Template error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::RateLimitExceeded {
                retry_after,
                limit,
                reset_time,
            } => return rate_limited_response(retry_after, limit, reset_time),
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

fn rate_limited_response(retry_after: u64, limit: u32, reset_time: i64) -> Response {
    let body = Json(ApiResponse {
        success: false,
        data: Some(RetryAfterBody { retry_after }),
        message: Some("Too many requests. Please try again later.".to_string()),
        meta: None,
        errors: None,
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
    let headers = response.headers_mut();
    headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(0u32));
    headers.insert("x-ratelimit-reset", HeaderValue::from(reset_time));
    response
}

pub type Result<T> = std::result::Result<T, AppError>;
