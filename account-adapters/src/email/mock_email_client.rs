use std::sync::Arc;

use account_core::{Email, EmailClient};
use secrecy::ExposeSecret;
use tokio::sync::Mutex;

/// Email client that records messages instead of delivering them. Used by the
/// API test suite to observe verification codes and reset tokens.
#[derive(Debug, Clone, Default)]
pub struct MockEmailClient {
    sent: Arc<Mutex<Vec<SentEmail>>>,
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub content: String,
    pub html: bool,
}

impl MockEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
        html: bool,
    ) -> Result<(), String> {
        tracing::debug!(
            "Recording email to {} with subject: {}",
            recipient.as_ref().expose_secret(),
            subject
        );

        self.sent.lock().await.push(SentEmail {
            recipient: recipient.as_ref().expose_secret().clone(),
            subject: subject.to_string(),
            content: content.to_string(),
            html,
        });

        Ok(())
    }
}
