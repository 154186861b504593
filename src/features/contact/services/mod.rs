pub mod contact_service;
pub mod notifier;
pub mod smtp_notifier;

pub use contact_service::ContactService;
pub use notifier::{ContactNotifier, TracingNotifier};
pub use smtp_notifier::SmtpNotifier;
