//! Build notifier chat adapter.
//!
//! Implements [`pipeline::MessageDispatcher`] by posting the serialised
//! [`pipeline::ChatMessage`] to a chat incoming webhook. Incoming webhooks
//! carry their authorisation in the URL, so no credentials are involved.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport and status handling live here. The
//! [`pipeline`] crate sees only [`pipeline::MessageDispatcher`].
//!
//! Delivery is a single attempt with the transport's default timeouts. Any
//! non-2xx answer is a [`pipeline::DispatchError`]; the response body is only
//! read to enrich that error.

use async_trait::async_trait;
use pipeline::{ChatMessage, ConfigurationError, DispatchError, MessageDispatcher};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use tracing::{debug, info, warn};

/// Posts chat messages to one pre-configured webhook URL.
pub struct WebhookDispatcher {
    webhook_url: Url,
    http: reqwest::Client,
}

impl WebhookDispatcher {
    /// Creates a dispatcher targeting `webhook_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidSetting`] if `webhook_url` is not an
    /// absolute http(s) URL.
    pub fn new(webhook_url: &str) -> Result<Self, ConfigurationError> {
        let invalid = |message: String| ConfigurationError::InvalidSetting {
            name: "chat-webhook".to_string(),
            message,
        };

        let webhook_url = Url::parse(webhook_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(webhook_url.scheme(), "http" | "https") {
            return Err(invalid("webhook URL must use http or https".to_string()));
        }

        info!(
            host = webhook_url.host_str().unwrap_or_default(),
            "Initializing chat webhook dispatcher"
        );
        Ok(Self {
            webhook_url,
            http: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl MessageDispatcher for WebhookDispatcher {
    async fn dispatch(&self, message: &ChatMessage) -> Result<(), DispatchError> {
        let body = serde_json::to_vec(message).map_err(|e| DispatchError::Serialize {
            message: e.to_string(),
        })?;
        debug!(len = body.len(), "Posting chat message");

        let response = self
            .http
            .post(self.webhook_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            // The webhook URL embeds its credentials; keep it out of the error.
            .map_err(|e| DispatchError::Transport {
                message: e.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Chat webhook returned error");
            return Err(DispatchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "Chat message accepted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
