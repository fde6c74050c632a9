//! Outbound email delivery.
//!
//! The provider is reached through [`EmailSender`] so handlers never depend on
//! a concrete transport. Production uses the Resend HTTP API; without an API
//! key the server runs with [`DisabledEmailSender`], which fails every send.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email delivery is not configured")]
    NotConfigured,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Email provider error {status}: {body}")]
    Provider { status: u16, body: String },
}

/// Outcome of one delivery attempt, as reported back to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryReport {
    pub fn delivered() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: &EmailError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
        }
    }
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError>;
}

#[derive(Clone)]
pub struct ResendEmailService {
    client: Client,
    api_key: String,
    base_url: String,
    from: String,
}

#[derive(Debug, Serialize)]
struct ResendSendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResendSendResponse {
    id: Option<String>,
}

impl ResendEmailService {
    pub fn new(api_key: String, base_url: String, from: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            from,
        }
    }
}

#[async_trait]
impl EmailSender for ResendEmailService {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        let url = format!("{}/emails", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ResendSendRequest {
                from: &self.from,
                to: [&message.to],
                subject: &message.subject,
                html: &message.html,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Provider { status, body });
        }

        let sent: ResendSendResponse = response.json().await?;
        tracing::debug!(
            "Email '{}' accepted by provider (id: {})",
            message.subject,
            sent.id.as_deref().unwrap_or("unknown")
        );

        Ok(())
    }
}

/// Stand-in used when no provider key is configured.
#[derive(Debug, Clone, Default)]
pub struct DisabledEmailSender;

#[async_trait]
impl EmailSender for DisabledEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        tracing::debug!("Dropping email '{}' to {}: sender disabled", message.subject, message.to);
        Err(EmailError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_sender_always_fails() {
        let sender = DisabledEmailSender;
        let result = sender
            .send(EmailMessage {
                to: "guest@example.com".to_string(),
                subject: "Hello".to_string(),
                html: "<p>Hi</p>".to_string(),
            })
            .await;

        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }

    #[test]
    fn test_delivery_report_from_error() {
        let report = DeliveryReport::failed(&EmailError::NotConfigured);
        assert!(!report.success);
        assert_eq!(report.error.as_deref(), Some("Email delivery is not configured"));
    }

    #[test]
    fn test_resend_base_url_is_normalised() {
        let service = ResendEmailService::new(
            "key".to_string(),
            "https://api.resend.com/".to_string(),
            "Club Grille <onboarding@resend.dev>".to_string(),
        );
        assert_eq!(service.base_url, "https://api.resend.com");
    }
}
