//! SES-backed email delivery
//!
//! The production mailer. An endpoint override switches the client to a
//! local SES stand-in (LocalStack) with static credentials, the same
//! arrangement the storage backends use for MinIO.

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_ses::config::SharedCredentialsProvider;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use aws_sdk_ses::Client;
use chrono::Utc;

use crate::{DeliveryReceipt, EmailConfig, EmailError, EmailService, OutboundEmail};

const DEFAULT_REGION: &str = "us-east-1";

pub struct SesEmailService {
    client: Client,
    config: EmailConfig,
}

impl SesEmailService {
    /// Build the SES client described by `config`.
    ///
    /// Reachability is probed once via the send quota; a failed probe
    /// only warns, because a LocalStack target may come up after us.
    pub async fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let region = Region::new(
            config
                .aws_region
                .clone()
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        );
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);
        if let Some(endpoint) = config.aws_endpoint_url.as_deref() {
            tracing::info!(endpoint, "email delivery routed to SES endpoint override");
            let credentials = Credentials::new("test", "test", None, None, "ses-endpoint-override");
            loader = loader
                .endpoint_url(endpoint)
                .credentials_provider(SharedCredentialsProvider::new(credentials));
        }
        let client = Client::new(&loader.load().await);

        match client.get_send_quota().send().await {
            Ok(_) => tracing::info!("SES reachable"),
            Err(e) => tracing::warn!(error = %e, "SES not reachable yet"),
        }

        Ok(Self { client, config })
    }
}

fn utf8(data: &str) -> Result<Content, EmailError> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| EmailError::Provider(format!("invalid message content: {e}")))
}

#[async_trait::async_trait]
impl EmailService for SesEmailService {
    async fn send_email(&self, email: OutboundEmail) -> Result<DeliveryReceipt, EmailError> {
        if !email.to.contains('@') || !email.from.contains('@') {
            return Err(EmailError::Validation(
                "sender and recipient must be email addresses".to_string(),
            ));
        }

        let mut body = Body::builder().text(utf8(&email.text)?);
        if let Some(html) = &email.html {
            body = body.html(utf8(html)?);
        }
        let ses_message = Message::builder()
            .subject(utf8(&email.subject)?)
            .body(body.build())
            .build();

        let mut request = self
            .client
            .send_email()
            .source(&email.from)
            .destination(Destination::builder().to_addresses(&email.to).build())
            .message(ses_message);
        if let Some(reply_to) = &email.reply_to {
            request = request.reply_to_addresses(reply_to);
        }

        let sent = request
            .send()
            .await
            .map_err(|e| EmailError::Provider(format!("SES send failed: {e}")))?;
        let message_id = sent.message_id().to_string();
        tracing::info!(to = %email.to, message_id = %message_id, "email sent via SES");

        Ok(DeliveryReceipt {
            message_id,
            provider: "aws-ses".to_string(),
            sent_at: Utc::now(),
        })
    }

    fn default_from(&self) -> String {
        self.config.default_from.clone()
    }

    fn app_base_url(&self) -> &str {
        &self.config.app_base_url
    }
}
