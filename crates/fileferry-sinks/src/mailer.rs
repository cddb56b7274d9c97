//! SMTP notification transport
//!
//! Sends the run notification over SMTP (async lettre), attaching the run's
//! log artifacts. The relay password may be a `${env:NAME}` secret reference
//! resolved at construction time.

use async_trait::async_trait;
use fileferry_config::{resolve_value, SmtpConfig};
use fileferry_types::{
    Error, NotificationEnvelope, NotificationTransport, NotifyPriority, Result, SecretResolver,
};
use lettre::message::header::{ContentType, Header, HeaderName, HeaderValue};
use lettre::message::{Attachment, Mailbox, Message, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{debug, warn};

/// Mail priority header understood by common clients
#[derive(Debug, Clone)]
struct XPriority(String);

impl XPriority {
    fn for_priority(priority: NotifyPriority) -> Self {
        match priority {
            NotifyPriority::High => Self("1 (Highest)".to_string()),
            NotifyPriority::Normal => Self("3 (Normal)".to_string()),
        }
    }
}

impl Header for XPriority {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-Priority")
    }

    fn parse(s: &str) -> std::result::Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self(s.to_string()))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.clone())
    }
}

/// Notification transport delivering envelopes over SMTP
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl SmtpNotifier {
    /// Build a notifier from SMTP settings, resolving any secret references
    pub fn from_config(smtp: &SmtpConfig, resolver: &dyn SecretResolver) -> Result<Self> {
        let from: Mailbox = smtp
            .from
            .parse()
            .map_err(|e| Error::notification(format!("Invalid sender '{}': {}", smtp.from, e)))?;

        let mut to = Vec::with_capacity(smtp.to.len());
        for recipient in &smtp.to {
            to.push(recipient.parse().map_err(|e| {
                Error::notification(format!("Invalid recipient '{recipient}': {e}"))
            })?);
        }

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
            .map_err(|e| Error::notification(format!("Invalid relay '{}': {}", smtp.host, e)))?
            .port(smtp.port);

        if let Some(username) = &smtp.username {
            let password = match &smtp.password {
                Some(password) => resolve_value(resolver, password)?,
                None => String::new(),
            };
            builder = builder.credentials(Credentials::new(username.clone(), password));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
        })
    }

    /// Assemble the MIME message for an envelope
    ///
    /// Attachments that cannot be read are skipped with a warning rather than
    /// failing the whole notification.
    pub async fn build_message(&self, envelope: &NotificationEnvelope) -> Result<Message> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(envelope.subject.clone())
            .header(XPriority::for_priority(envelope.priority));
        for recipient in &self.to {
            builder = builder.to(recipient.clone());
        }

        let body = SinglePart::builder()
            .header(ContentType::TEXT_PLAIN)
            .body(envelope.body.clone());
        let mut multipart = MultiPart::mixed().singlepart(body);

        for path in &envelope.attachments {
            let content = match tokio::fs::read(path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping attachment '{}': {}", path.display(), e);
                    continue;
                }
            };
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "attachment".to_string());
            let content_type = ContentType::parse("application/json")
                .map_err(|e| Error::notification(format!("Invalid content type: {e}")))?;
            multipart = multipart.singlepart(Attachment::new(file_name).body(content, content_type));
            debug!("Attached '{}'", path.display());
        }

        builder
            .multipart(multipart)
            .map_err(|e| Error::notification(format!("Failed to build message: {e}")))
    }
}

#[async_trait]
impl NotificationTransport for SmtpNotifier {
    async fn send(&self, envelope: &NotificationEnvelope) -> Result<()> {
        let message = self.build_message(envelope).await?;
        self.transport
            .send(message)
            .await
            .map_err(|e| Error::notification(format!("SMTP send failed: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fileferry_config::EnvSecretResolver;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "mail.example.com".to_string(),
            port: 587,
            username: Some("ferry".to_string()),
            password: Some("plaintext".to_string()),
            from: "Ferry <ferry@example.com>".to_string(),
            to: vec!["ops@example.com".to_string()],
        }
    }

    fn envelope(attachments: Vec<PathBuf>) -> NotificationEnvelope {
        NotificationEnvelope {
            subject: "2 error(s), 5 file action(s)".to_string(),
            priority: NotifyPriority::High,
            body: "details follow".to_string(),
            attachments,
        }
    }

    #[tokio::test]
    async fn test_from_config_builds() {
        let notifier = SmtpNotifier::from_config(&smtp_config(), &EnvSecretResolver::new());
        assert!(notifier.is_ok());
    }

    #[test]
    fn test_invalid_sender_is_rejected() {
        let mut config = smtp_config();
        config.from = "not an address".to_string();
        let result = SmtpNotifier::from_config(&config, &EnvSecretResolver::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_unresolvable_password_reference_fails() {
        let mut config = smtp_config();
        config.password = Some("${env:FILEFERRY_UNSET_SMTP_PASSWORD}".to_string());
        let result = SmtpNotifier::from_config(&config, &EnvSecretResolver::new());
        assert!(matches!(result, Err(Error::SecretNotFound { .. })));
    }

    #[tokio::test]
    async fn test_message_carries_subject_and_priority() {
        let notifier =
            SmtpNotifier::from_config(&smtp_config(), &EnvSecretResolver::new()).unwrap();
        let message = notifier.build_message(&envelope(Vec::new())).await.unwrap();

        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("2 error(s), 5 file action(s)"));
        assert!(formatted.contains("X-Priority: 1 (Highest)"));
        assert!(formatted.contains("ops@example.com"));
    }

    #[tokio::test]
    async fn test_attachments_are_embedded() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = temp_dir.path().join("actions.json");
        std::fs::write(&artifact, b"[{\"success\":true}]").unwrap();

        let notifier =
            SmtpNotifier::from_config(&smtp_config(), &EnvSecretResolver::new()).unwrap();
        let message = notifier
            .build_message(&envelope(vec![artifact]))
            .await
            .unwrap();

        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("actions.json"));
    }

    #[tokio::test]
    async fn test_missing_attachment_is_skipped() {
        let notifier =
            SmtpNotifier::from_config(&smtp_config(), &EnvSecretResolver::new()).unwrap();
        let message = notifier
            .build_message(&envelope(vec![PathBuf::from("/no/such/file.json")]))
            .await;
        assert!(message.is_ok(), "a lost attachment must not sink the mail");
    }
}
