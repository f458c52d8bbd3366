//! Completion notifications.
//!
//! The only sender today is a Teams incoming webhook. Notifications are
//! best-effort: the finalizer logs a failure and moves on.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::config::secrets::{ExposeSecret, SecretString};
use crate::error::{Error, Result};
use crate::http::error_for_status;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, message: &str) -> Result<()>;
}

/// Posts an Adaptive Card to a Teams incoming webhook.
pub struct TeamsWebhook {
    client: reqwest::Client,
    url: SecretString,
}

impl TeamsWebhook {
    pub fn new(client: reqwest::Client, url: SecretString) -> Self {
        Self { client, url }
    }
}

/// Message body for a Teams webhook: a bold title block over a wrapped text block.
pub fn adaptive_card(title: &str, message: &str) -> serde_json::Value {
    json!({
        "type": "message",
        "attachments": [{
            "contentType": "application/vnd.microsoft.card.adaptive",
            "contentUrl": null,
            "content": {
                "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
                "type": "AdaptiveCard",
                "version": "1.2",
                "body": [
                    {
                        "type": "TextBlock",
                        "text": title,
                        "wrap": true,
                        "size": "Medium",
                        "weight": "Bolder"
                    },
                    {
                        "type": "TextBlock",
                        "text": message,
                        "wrap": true
                    }
                ]
            }
        }]
    })
}

#[async_trait]
impl Notifier for TeamsWebhook {
    async fn notify(&self, title: &str, message: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url.expose_secret())
            .json(&adaptive_card(title, message))
            .send()
            .await
            .map_err(|e| Error::NotificationFailed(e.without_url().to_string()))?;
        let response = error_for_status(response)
            .await
            .map_err(Error::NotificationFailed)?;
        debug!(status = %response.status(), "teams notification sent");
        Ok(())
    }
}
