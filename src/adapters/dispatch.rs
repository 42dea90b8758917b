//! AI + notification dispatcher.
//!
//! Composes the x.ai client and the mailer: query the model, wrap the
//! answer in the notification HTML template, send it. One failed leg
//! fails the dispatch; the caller maps that to the ai-email outcome.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Local;

use super::{Dispatcher, Mailer, XaiClient};

/// Production dispatcher: x.ai for answers, SMTPS for delivery.
pub struct AiEmailDispatcher {
    ai: XaiClient,
    mailer: Mailer,
}

impl Default for AiEmailDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AiEmailDispatcher {
    pub fn new() -> Self {
        Self {
            ai: XaiClient::new(),
            mailer: Mailer::new(),
        }
    }

    pub fn with_clients(ai: XaiClient, mailer: Mailer) -> Self {
        Self { ai, mailer }
    }
}

#[async_trait]
impl Dispatcher for AiEmailDispatcher {
    async fn dispatch(
        &self,
        query: &str,
        api_key: &str,
        sender_email: &str,
        sender_password: &str,
        recipient_email: &str,
    ) -> Result<()> {
        let answer = self
            .ai
            .complete(api_key, query)
            .await
            .context("AI query failed")?;

        let html = render_notification(query, &answer);

        self.mailer
            .send_html(sender_email, sender_password, recipient_email, &html)
            .await
            .context("Notification email failed")?;

        Ok(())
    }
}

/// The fixed notification template: query header, AI answer, timestamp.
fn render_notification(query: &str, answer: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!(
        r#"<html>
<head>
<style>
    body {{ font-family: Arial, sans-serif; margin: 0; padding: 8px; }}
    .header {{ color: #333; font-size: 16px; border-bottom: 1px solid #ddd; padding-bottom: 4px; margin-bottom: 8px; }}
    .content {{ display: inline-block; margin-left: 8px; }}
    .timestamp {{ color: #888; font-size: 12px; margin-top: 8px; border-top: 1px solid #ddd; padding-top: 4px; }}
</style>
</head>
<body>
    <div class="header">Ask Bumblebee: {query}</div>
    {answer}
    <div class="timestamp">{timestamp}</div>
</body>
</html>
"#
    )
}
