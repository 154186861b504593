/// Message returned for accepted contact submissions (including honeypot hits)
pub const CONTACT_SUCCESS_MESSAGE: &str = "Thank you for your message! We'll get back to you soon.";

// =============================================================================
// CMS CONSTANTS
// =============================================================================

/// Root prefix for the CMS populate parameter
pub const POPULATE_ROOT: &str = "populate";

/// Default sort used for collection items attached to a section
pub const ORDER_ASC: &str = "order:asc";

/// Component identifiers of generic page sections
pub const CONTENT_SECTION: &str = "sections.content-section";
pub const SIMPLE_IMAGE_SECTION: &str = "sections.simple-image-section";
pub const POLICY_SECTION: &str = "sections.policy-section";
