//! In-memory email capture
//!
//! Records every send instead of delivering it. Tests pull messages
//! back out by recipient or by the `email_type` tag the content
//! builders attach.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::{DeliveryReceipt, EmailConfig, EmailError, EmailService, OutboundEmail};

/// One recorded send.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub email: OutboundEmail,
    pub receipt: DeliveryReceipt,
}

impl SentEmail {
    /// The `email_type` tag, when the message carries one.
    pub fn kind(&self) -> Option<&str> {
        self.email.tags.get("email_type").map(String::as_str)
    }
}

/// Capturing [`EmailService`] backend. Clones share one outbox.
#[derive(Debug, Clone)]
pub struct MockEmailService {
    outbox: Arc<Mutex<Vec<SentEmail>>>,
    discard: bool,
    sender: String,
    base_url: String,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self {
            outbox: Arc::new(Mutex::new(Vec::new())),
            discard: false,
            sender: "info@hexagon.example".to_string(),
            base_url: "https://hexagon.example".to_string(),
        }
    }

    /// A mock that honors the configured sender and base URL, so links
    /// in captured bodies match what production would emit.
    pub fn from_config(config: &EmailConfig) -> Self {
        Self {
            sender: config.default_from.clone(),
            base_url: config.app_base_url.clone(),
            ..Self::new()
        }
    }

    /// A mock that acknowledges sends without recording them.
    pub fn discarding() -> Self {
        Self {
            discard: true,
            ..Self::new()
        }
    }

    /// Everything sent so far, in send order.
    pub fn sent(&self) -> Vec<SentEmail> {
        self.outbox.lock().unwrap().clone()
    }

    pub fn sent_to(&self, recipient: &str) -> Vec<SentEmail> {
        self.sent()
            .into_iter()
            .filter(|sent| sent.email.to == recipient)
            .collect()
    }

    /// The most recent message of `kind` addressed to `recipient`.
    pub fn last_of_kind(&self, recipient: &str, kind: &str) -> Option<SentEmail> {
        self.sent_to(recipient)
            .into_iter()
            .rev()
            .find(|sent| sent.kind() == Some(kind))
    }

    pub fn count(&self) -> usize {
        self.outbox.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.outbox.lock().unwrap().clear();
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, email: OutboundEmail) -> Result<DeliveryReceipt, EmailError> {
        let receipt = DeliveryReceipt {
            message_id: format!("mock-{}", Uuid::new_v4().simple()),
            provider: "mock".to_string(),
            sent_at: Utc::now(),
        };

        if self.discard {
            tracing::debug!(to = %email.to, "mock email discarded");
            return Ok(receipt);
        }

        tracing::debug!(to = %email.to, subject = %email.subject, "mock email captured");
        self.outbox.lock().unwrap().push(SentEmail {
            email,
            receipt: receipt.clone(),
        });

        Ok(receipt)
    }

    fn default_from(&self) -> String {
        self.sender.clone()
    }

    fn app_base_url(&self) -> &str {
        &self.base_url
    }
}
