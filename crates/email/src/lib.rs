//! Email delivery for enrollment and contact workflows
//!
//! One [`EmailService`] trait with two implementations: SES for
//! production (with a LocalStack endpoint override) and a capturing
//! mock for tests and development. Sends are best-effort throughout
//! the application: a failed notification is logged and never fails
//! the request that triggered it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

pub mod aws_ses;
pub mod content;
pub mod mock;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("email configuration error: {0}")]
    Configuration(String),

    #[error("email validation error: {0}")]
    Validation(String),

    #[error("email provider error: {0}")]
    Provider(String),
}

/// A message handed to an [`EmailService`] for delivery.
///
/// `tags` carry bookkeeping values (the content builders always set
/// `email_type`); providers may attach them to the outgoing message,
/// the mock exposes them for assertions.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub from: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
    pub tags: HashMap<String, String>,
}

impl OutboundEmail {
    /// A plain-text message; HTML and tags are layered on afterwards.
    pub fn plain(
        to: impl Into<String>,
        from: impl Into<String>,
        subject: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            reply_to: None,
            subject: subject.into(),
            text: text.into(),
            html: None,
            tags: HashMap::new(),
        }
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to = Some(address.into());
        self
    }

    pub fn tag(mut self, key: &str, value: impl Into<String>) -> Self {
        self.tags.insert(key.to_string(), value.into());
        self
    }
}

/// Proof of a completed hand-off to the provider.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub message_id: String,
    pub provider: String,
    pub sent_at: DateTime<Utc>,
}

/// Delivery settings, read once at startup.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// `ses` or `mock`.
    pub provider: String,
    pub aws_region: Option<String>,
    /// Routes the SES client to a LocalStack stand-in when set.
    pub aws_endpoint_url: Option<String>,
    pub default_from: String,
    /// `false` swaps in the mock regardless of `provider`.
    pub enabled: bool,
    /// Base for links embedded in message bodies.
    pub app_base_url: String,
}

fn env_or(key: &str, fallback: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| fallback.to_string())
}

impl EmailConfig {
    pub fn from_env() -> Result<Self, EmailError> {
        dotenvy::dotenv().ok();

        let enabled = !matches!(
            std::env::var("EMAIL_ENABLED").as_deref(),
            Ok("false") | Ok("0")
        );

        Ok(Self {
            provider: env_or("EMAIL_PROVIDER", "mock"),
            aws_region: std::env::var("AWS_REGION").ok(),
            aws_endpoint_url: std::env::var("AWS_ENDPOINT_URL").ok(),
            default_from: env_or("FROM_EMAIL", "info@hexagon.example"),
            enabled,
            app_base_url: env_or("APP_BASE_URL", "https://hexagon.example"),
        })
    }
}

/// Sends application email. Implementations supply [`send_email`] and
/// the two accessors; the workflow messages are assembled here so every
/// backend produces identical content.
///
/// [`send_email`]: EmailService::send_email
#[async_trait::async_trait]
pub trait EmailService: Send + Sync {
    async fn send_email(&self, email: OutboundEmail) -> Result<DeliveryReceipt, EmailError>;

    /// Sender address for outgoing mail.
    fn default_from(&self) -> String;

    /// Base URL for links embedded in message bodies.
    fn app_base_url(&self) -> &str;

    /// Tell a student their enrollment was recorded and where to check
    /// on it.
    async fn send_enrollment_confirmation(
        &self,
        recipient_email: &str,
        student_name: &str,
        course_title: &str,
        class_code: &str,
        enrollment_id: Uuid,
    ) -> Result<DeliveryReceipt, EmailError> {
        let status_url = format!("{}/enrollments/{}", self.app_base_url(), enrollment_id);

        let email = OutboundEmail::plain(
            recipient_email,
            self.default_from(),
            format!("Enrollment received: {course_title}"),
            content::enrollment_confirmation_text(
                student_name,
                course_title,
                class_code,
                &status_url,
            ),
        )
        .html(content::enrollment_confirmation_html(
            student_name,
            course_title,
            class_code,
            &status_url,
        ))
        .tag("email_type", "enrollment_confirmation")
        .tag("enrollment_id", enrollment_id.to_string())
        .tag("class_code", class_code);

        self.send_email(email).await
    }

    /// Notify the site operator about a new contact inquiry.
    async fn send_inquiry_admin_notification(
        &self,
        admin_email: &str,
        full_name: &str,
        phone: &str,
        email: Option<&str>,
        inquiry_message: &str,
        course_title: Option<&str>,
    ) -> Result<DeliveryReceipt, EmailError> {
        let notification = OutboundEmail::plain(
            admin_email,
            self.default_from(),
            format!("New contact inquiry from {full_name}"),
            content::inquiry_admin_notification_text(
                full_name,
                phone,
                email,
                inquiry_message,
                course_title,
            ),
        )
        .tag("email_type", "inquiry_admin_notification");

        self.send_email(notification).await
    }

    /// Confirm to the inquirer that their message arrived.
    async fn send_inquiry_confirmation(
        &self,
        recipient_email: &str,
        full_name: &str,
    ) -> Result<DeliveryReceipt, EmailError> {
        let email = OutboundEmail::plain(
            recipient_email,
            self.default_from(),
            "We received your inquiry",
            content::inquiry_confirmation_text(full_name),
        )
        .html(content::inquiry_confirmation_html(full_name))
        .tag("email_type", "inquiry_confirmation");

        self.send_email(email).await
    }
}

pub struct EmailServiceFactory;

impl EmailServiceFactory {
    /// Pick a backend from the configuration. A disabled config always
    /// resolves to the mock, so no SES client is ever built for it.
    pub async fn create(config: EmailConfig) -> Result<Box<dyn EmailService>, EmailError> {
        let provider = if config.enabled {
            config.provider.clone()
        } else {
            "mock".to_string()
        };
        tracing::info!(provider = %provider, enabled = config.enabled, "configuring email delivery");

        match provider.as_str() {
            "ses" | "aws-ses" => Ok(Box::new(aws_ses::SesEmailService::new(config).await?)),
            "mock" => Ok(Box::new(mock::MockEmailService::from_config(&config))),
            other => Err(EmailError::Configuration(format!(
                "unknown email provider '{other}' (expected ses or mock)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_email_builder() {
        let email = OutboundEmail::plain(
            "student@example.com",
            "info@hexagon.example",
            "Test Subject",
            "Test body",
        )
        .html("<p>Test body</p>")
        .reply_to("reply@hexagon.example")
        .tag("email_type", "test");

        assert_eq!(email.to, "student@example.com");
        assert_eq!(email.from, "info@hexagon.example");
        assert_eq!(email.subject, "Test Subject");
        assert_eq!(email.text, "Test body");
        assert_eq!(email.html.as_deref(), Some("<p>Test body</p>"));
        assert_eq!(email.reply_to.as_deref(), Some("reply@hexagon.example"));
        assert_eq!(email.tags.get("email_type").map(String::as_str), Some("test"));
    }

    #[test]
    #[serial_test::serial]
    fn test_email_config_defaults() {
        std::env::remove_var("EMAIL_PROVIDER");
        std::env::remove_var("FROM_EMAIL");
        std::env::remove_var("EMAIL_ENABLED");

        let config = EmailConfig::from_env().unwrap();
        assert_eq!(config.provider, "mock");
        assert_eq!(config.default_from, "info@hexagon.example");
        assert!(config.enabled);
    }

    #[test]
    #[serial_test::serial]
    fn test_email_config_disabled_values() {
        std::env::set_var("EMAIL_ENABLED", "0");
        let config = EmailConfig::from_env().unwrap();
        assert!(!config.enabled);

        std::env::set_var("EMAIL_ENABLED", "true");
        let config = EmailConfig::from_env().unwrap();
        assert!(config.enabled);

        std::env::remove_var("EMAIL_ENABLED");
    }

    #[tokio::test]
    async fn test_factory_rejects_unknown_provider() {
        let config = EmailConfig {
            provider: "carrier-pigeon".to_string(),
            aws_region: None,
            aws_endpoint_url: None,
            default_from: "info@hexagon.example".to_string(),
            enabled: true,
            app_base_url: "https://hexagon.example".to_string(),
        };
        assert!(matches!(
            EmailServiceFactory::create(config).await,
            Err(EmailError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_factory_disabled_resolves_to_mock() {
        let config = EmailConfig {
            provider: "ses".to_string(),
            aws_region: None,
            aws_endpoint_url: None,
            default_from: "admin@hexagon.example".to_string(),
            enabled: false,
            app_base_url: "https://hexagon.example".to_string(),
        };
        let service = EmailServiceFactory::create(config).await.unwrap();
        assert_eq!(service.default_from(), "admin@hexagon.example");

        let receipt = service
            .send_email(OutboundEmail::plain(
                "a@example.com",
                "admin@hexagon.example",
                "s",
                "t",
            ))
            .await
            .unwrap();
        assert_eq!(receipt.provider, "mock");
    }
}
