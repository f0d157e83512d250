//! Outbound reminder delivery.
//!
//! The scheduler only knows the [`Notifier`] contract; a delivery failure
//! is reported back for logging and never aborts a tick. The production
//! implementation posts mail messages to an HTTP mail gateway. Without a
//! gateway configured, reminders land in the log so local runs work
//! without credentials.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::config::{Config, MailGatewayConfig};

/// Delivery failure for a single recipient.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("mail gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail gateway rejected the message: {0}")]
    Rejected(StatusCode),
}

/// Turns one (user, pending tasks) pair into a sent reminder.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        email: &str,
        pending: &[String],
        scheduled_time: &str,
    ) -> Result<(), NotifyError>;
}

/// Pick the notifier matching the loaded configuration.
pub fn from_config(config: &Config) -> Arc<dyn Notifier> {
    match &config.mail {
        Some(mail) => Arc::new(HttpNotifier::new(mail.clone())),
        None => {
            tracing::warn!("NUDGE_MAIL_URL not set, reminders will only be logged");
            Arc::new(LogNotifier)
        }
    }
}

/// Sends reminder mail by POSTing a message to an HTTP mail gateway.
pub struct HttpNotifier {
    config: MailGatewayConfig,
    client: Client,
}

impl HttpNotifier {
    pub fn new(config: MailGatewayConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn render_html(pending: &[String]) -> String {
        let items: String = pending
            .iter()
            .map(|description| format!("<li style=\"margin-bottom: 5px;\">{}</li>", description))
            .collect();
        format!(
            "<div style=\"font-family: Arial, sans-serif; color: #333;\">\
             <h2>Hello! ✨</h2>\
             <p>Just a quick reminder that you still have a few things to do:</p>\
             <ul>{items}</ul>\
             <p>Go get them done!</p>\
             <p><em>Your task assistant</em></p>\
             </div>"
        )
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(
        &self,
        email: &str,
        pending: &[String],
        _scheduled_time: &str,
    ) -> Result<(), NotifyError> {
        let message = json!({
            "from": self.config.from,
            "to": email,
            "subject": "You have pending tasks! 📝",
            "html": Self::render_html(pending),
        });

        let mut request = self.client.post(&self.config.url).json(&message);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status()));
        }
        Ok(())
    }
}

/// Logs reminders instead of delivering them.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        email: &str,
        pending: &[String],
        scheduled_time: &str,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            "reminder for {} at {}: {} pending task(s)",
            email,
            scheduled_time,
            pending.len()
        );
        Ok(())
    }
}
