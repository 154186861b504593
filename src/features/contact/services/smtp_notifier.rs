use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::Error as SmtpError;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::ContactNotifier;
use crate::core::config::SmtpConfig;
use crate::core::error::{AppError, Result};
use crate::features::contact::models::ContactMessage;

const SMTP_TIMEOUT: Duration = Duration::from_secs(15);
const SITE_NAME: &str = "beicapelli.com";

/// Mails every accepted submission to the salon inbox
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    to: Mailbox,
    from: Address,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let builder = if config.implicit_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| AppError::Internal(format!("Invalid SMTP host {}: {}", config.host, e)))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        let to = config
            .mail_to
            .parse::<Mailbox>()
            .map_err(|e| AppError::Internal(format!("Invalid MAIL_TO address: {}", e)))?;
        let from = config
            .mail_from
            .parse::<Address>()
            .map_err(|e| AppError::Internal(format!("Invalid MAIL_FROM address: {}", e)))?;

        Ok(Self {
            transport,
            to,
            from,
        })
    }

    /// From carries the visitor's name, Reply-To their address
    fn build_message(&self, message: &ContactMessage) -> Result<Message> {
        let name = single_line(&message.name);
        let reply_to = message
            .email
            .parse::<Mailbox>()
            .map_err(|e| AppError::BadRequest(format!("Invalid reply address: {}", e)))?;

        Message::builder()
            .from(Mailbox::new(Some(name.clone()), self.from.clone()))
            .reply_to(reply_to)
            .to(self.to.clone())
            .subject(format!("Contact formulier - {}", name))
            .header(ContentType::TEXT_PLAIN)
            .body(message_text(message))
            .map_err(|e| AppError::Internal(format!("Failed to build contact email: {}", e)))
    }
}

#[async_trait]
impl ContactNotifier for SmtpNotifier {
    async fn deliver(&self, message: &ContactMessage) -> Result<()> {
        let email = self.build_message(message)?;

        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| AppError::ExternalServiceError(describe(&e)))?;

        tracing::debug!(
            id = %message.id,
            code = %response.code(),
            "Contact message accepted by SMTP server"
        );
        Ok(())
    }
}

fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

fn message_text(message: &ContactMessage) -> String {
    format!(
        "Contact Formulier\n\nNaam: {}\nEmail: {}\n\nBericht:\n{}\n\n---\n\
         Dit email is verzonden vanuit het contactformulier op {}",
        message.name, message.email, message.message, SITE_NAME
    )
}

fn describe(error: &SmtpError) -> String {
    if error.is_timeout() {
        "SMTP connection timed out".to_string()
    } else if error.is_permanent() {
        format!("SMTP server rejected the message: {}", error)
    } else {
        format!("Failed to send email via SMTP: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::contact::dtos::ContactFormDto;

    fn config(port: u16) -> SmtpConfig {
        SmtpConfig {
            host: "localhost".to_string(),
            port,
            username: "info@beicapelli.com".to_string(),
            password: "secret".to_string(),
            mail_to: "salon@beicapelli.com".to_string(),
            mail_from: "noreply@beicapelli.com".to_string(),
        }
    }

    fn contact_message(name: &str) -> ContactMessage {
        let dto = ContactFormDto {
            name: name.to_string(),
            email: "anna@example.com".to_string(),
            message: "Kan ik zaterdag langskomen?".to_string(),
            ..Default::default()
        };
        ContactMessage::from_form(dto, "203.0.113.7".to_string())
    }

    #[test]
    fn test_message_headers_and_body() {
        let notifier = SmtpNotifier::new(&config(587)).unwrap();
        let email = notifier.build_message(&contact_message("Anna")).unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();

        assert!(raw.contains("<noreply@beicapelli.com>"));
        assert!(raw.contains("To: salon@beicapelli.com"));
        assert!(raw.contains("Reply-To: anna@example.com"));
        assert!(raw.contains("Subject: Contact formulier - Anna"));
        assert!(raw.contains("Naam: Anna"));
        assert!(raw.contains("Kan ik zaterdag langskomen?"));
    }

    #[test]
    fn test_name_cannot_inject_headers() {
        let notifier = SmtpNotifier::new(&config(465)).unwrap();
        let email = notifier
            .build_message(&contact_message("Anna\r\nBcc: spam@example.com"))
            .unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();

        assert!(!raw.contains("\r\nBcc:"));
    }

    #[test]
    fn test_invalid_recipient_is_rejected() {
        let mut config = config(587);
        config.mail_to = "not an address".to_string();
        assert!(matches!(
            SmtpNotifier::new(&config),
            Err(AppError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_external_error() {
        // Nothing listens on the discard port
        let notifier = SmtpNotifier::new(&config(9)).unwrap();
        let result = notifier.deliver(&contact_message("Anna")).await;
        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }
}
