use thiserror::Error;

/// Failures of the CMS fetch layer
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("Invalid CMS URL: {0}")]
    InvalidUrl(String),

    #[error("CMS request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("CMS API error: {status} for {endpoint} - {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode CMS response for {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Empty response from CMS - check if {content_type} content exists and is published")]
    EmptyResponse { content_type: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl CmsError {
    pub fn is_empty_response(&self) -> bool {
        matches!(self, CmsError::EmptyResponse { .. })
    }
}
