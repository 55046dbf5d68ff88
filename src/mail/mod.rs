use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::config::MailConfig;

/// A contact-form submission on its way to the site owner's inbox.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactMessage {
    /// Plain-text body as delivered to the recipient.
    pub fn body_text(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\n\nMessage:\n{}",
            self.name, self.email, self.message
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Relay rejected message: {0}")]
    Rejected(StatusCode),

    #[error("Mail config error: {0}")]
    Config(String),
}

/// Outbound delivery for contact messages. Implementations own transport
/// details only; validation happens before a message gets here.
#[async_trait]
pub trait ContactMailer: Send + Sync {
    async fn send(&self, message: &ContactMessage) -> Result<(), MailError>;
}

/// Mailer that POSTs each message to an HTTP mail relay as JSON.
pub struct HttpRelayMailer {
    client: Client,
    endpoint: Url,
    token: Option<String>,
    sender: String,
    recipient: String,
}

impl HttpRelayMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let relay_url = config
            .relay_url
            .as_deref()
            .ok_or_else(|| MailError::Config("relay_url is not set".into()))?;
        let endpoint = Url::parse(relay_url)
            .map_err(|e| MailError::Config(format!("invalid relay_url: {e}")))?;
        let recipient = config
            .recipient
            .clone()
            .ok_or_else(|| MailError::Config("recipient is not set".into()))?;
        let sender = config.sender.clone().unwrap_or_else(|| recipient.clone());
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            token: config.auth_token.clone(),
            sender,
            recipient,
        })
    }

    /// JSON body the relay expects. Replies go to the visitor, not the
    /// relay sender.
    fn payload(&self, message: &ContactMessage) -> serde_json::Value {
        serde_json::json!({
            "from": self.sender,
            "to": self.recipient,
            "reply_to": message.email,
            "subject": message.subject,
            "text": message.body_text(),
        })
    }
}

#[async_trait]
impl ContactMailer for HttpRelayMailer {
    async fn send(&self, message: &ContactMessage) -> Result<(), MailError> {
        let payload = self.payload(message);

        let mut request = self.client.post(self.endpoint.clone()).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(MailError::Rejected(response.status()));
        }

        Ok(())
    }
}

/// Mailer used when no relay is configured; messages only reach the log.
pub struct LogMailer;

#[async_trait]
impl ContactMailer for LogMailer {
    async fn send(&self, message: &ContactMessage) -> Result<(), MailError> {
        tracing::info!(
            "Contact message from {} <{}> with subject '{}' (no mail relay configured)",
            message.name,
            message.email,
            message.subject
        );
        Ok(())
    }
}

/// Pick a mailer for the configuration.
pub fn from_config(config: &MailConfig) -> anyhow::Result<Arc<dyn ContactMailer>> {
    if config.relay_url.is_none() {
        tracing::warn!("No mail relay configured; contact messages will only be logged");
        return Ok(Arc::new(LogMailer));
    }

    Ok(Arc::new(HttpRelayMailer::new(config)?))
}
