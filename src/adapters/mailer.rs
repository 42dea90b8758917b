//! SMTP email notifications.
//!
//! Sends the AI answer as a plain+HTML multipart message over implicit
//! TLS (Gmail submission on port 465).

use anyhow::{Context, Result};
use chrono::Local;
use lettre::message::MultiPart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

const PLAIN_FALLBACK: &str = "Please view this email with an HTML-capable email client.";

/// Email sender over SMTPS.
pub struct Mailer {
    smtp_host: String,
}

impl Default for Mailer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mailer {
    pub fn new() -> Self {
        Self {
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
        }
    }

    pub fn with_host(smtp_host: &str) -> Self {
        Self {
            smtp_host: smtp_host.to_string(),
        }
    }

    /// Send an HTML message with a timestamped subject.
    pub async fn send_html(
        &self,
        sender_email: &str,
        sender_password: &str,
        recipient_email: &str,
        html_body: &str,
    ) -> Result<()> {
        let subject = format!("Bumblebee - {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

        let message = Message::builder()
            .from(sender_email.parse().context("Invalid sender address")?)
            .to(recipient_email.parse().context("Invalid recipient address")?)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                PLAIN_FALLBACK.to_string(),
                html_body.to_string(),
            ))
            .context("Failed to build email message")?;

        let transport: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.smtp_host)
                .context("Failed to configure SMTP transport")?
                .credentials(Credentials::new(
                    sender_email.to_string(),
                    sender_password.to_string(),
                ))
                .build();

        transport
            .send(message)
            .await
            .context("Failed to send email")?;

        tracing::info!("Email sent to {recipient_email}");

        Ok(())
    }
}
