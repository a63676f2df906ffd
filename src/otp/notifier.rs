//! Code delivery over authenticated SMTP.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::error::DeliveryError;

pub const EMAIL_SUBJECT: &str = "Your verification code";

/// Delivers a code to a recipient.
///
/// Failure is an ordinary outcome here: implementations report it through
/// the returned `Result` and never panic.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_code(&self, recipient: &str, code: &str) -> Result<(), DeliveryError>;
}

/// Plain-text message body stating the code and how long it is good for.
pub fn render_body(code: &str, validity: Duration) -> String {
    let minutes = validity.as_secs().div_ceil(60).max(1);
    let unit = if minutes == 1 { "minute" } else { "minutes" };
    format!("Your verification code is {code}. It is valid for {minutes} {unit}.")
}

// == SMTP Notifier ==
/// Sends one email per code through a STARTTLS submission relay.
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    validity: Duration,
}

impl SmtpNotifier {
    /// Builds the transport. No connection is opened until the first send.
    pub fn new(config: &MailConfig, validity: Duration) -> Result<Self, DeliveryError> {
        let from: Mailbox = config
            .from_address
            .parse()
            .map_err(|e| DeliveryError::InvalidAddress(format!("{}: {e}", config.from_address)))?;

        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| DeliveryError::Transport(e.to_string()))?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            "SMTP notifier configured"
        );

        Ok(Self {
            mailer,
            from,
            validity,
        })
    }

    fn build_message(&self, recipient: &str, code: &str) -> Result<Message, DeliveryError> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| DeliveryError::InvalidAddress(format!("{recipient}: {e}")))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(EMAIL_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(render_body(code, self.validity))
            .map_err(|e| DeliveryError::Message(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_code(&self, recipient: &str, code: &str) -> Result<(), DeliveryError> {
        let message = match self.build_message(recipient, code) {
            Ok(message) => message,
            Err(e) => {
                warn!(recipient, error = %e, "could not build OTP email");
                return Err(e);
            }
        };

        match self.mailer.send(message).await {
            Ok(_) => {
                info!(recipient, "OTP email sent");
                Ok(())
            }
            Err(e) => {
                warn!(recipient, error = %e, "OTP email delivery failed");
                Err(DeliveryError::Transport(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_config() -> MailConfig {
        MailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            username: "mailer@example.com".to_string(),
            password: "secret".to_string(),
            from_address: "mailer@example.com".to_string(),
        }
    }

    #[test]
    fn test_render_body_states_code_and_window() {
        let body = render_body("042137", Duration::from_secs(300));
        assert_eq!(
            body,
            "Your verification code is 042137. It is valid for 5 minutes."
        );
    }

    #[test]
    fn test_render_body_singular_minute() {
        let body = render_body("1", Duration::from_secs(30));
        assert!(body.ends_with("valid for 1 minute."));
    }

    #[tokio::test]
    async fn test_smtp_notifier_builds_message() {
        let notifier = SmtpNotifier::new(&mail_config(), Duration::from_secs(300)).unwrap();
        let message = notifier.build_message("user@example.com", "123456").unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("To: user@example.com"));
        assert!(raw.contains("Subject: Your verification code"));
        assert!(raw.contains("123456"));
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_reported_not_raised() {
        let notifier = SmtpNotifier::new(&mail_config(), Duration::from_secs(300)).unwrap();
        let result = notifier.send_code("not an address", "123456").await;
        assert!(matches!(result, Err(DeliveryError::InvalidAddress(_))));
    }

    #[test]
    fn test_invalid_sender_rejected_at_construction() {
        let mut config = mail_config();
        config.from_address = "nobody".to_string();
        assert!(matches!(
            SmtpNotifier::new(&config, Duration::from_secs(300)),
            Err(DeliveryError::InvalidAddress(_))
        ));
    }
}
