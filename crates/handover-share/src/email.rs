//! E-mail share target sending the document as an SMTP attachment.

use async_trait::async_trait;
use handover_core::{Config, HandoverError, ShareError, ShareOutcome, ShareRequest, ShareTarget};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::path::Path;
use std::sync::Arc;

fn attachment_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[derive(Clone)]
pub struct EmailShare {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl EmailShare {
    /// Build the SMTP transport from `SMTP_*` settings.
    pub fn from_config(config: &Config) -> Result<Self, HandoverError> {
        let smtp = config.smtp();
        let host = smtp
            .host
            .as_deref()
            .ok_or_else(|| HandoverError::Config("SMTP_HOST not configured".to_string()))?;
        let from: Mailbox = smtp
            .from
            .as_deref()
            .ok_or_else(|| HandoverError::Config("SMTP_FROM not configured".to_string()))?
            .parse()
            .map_err(|e| HandoverError::Config(format!("Invalid SMTP_FROM: {}", e)))?;

        let builder = if smtp.tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| HandoverError::Config(format!("Invalid SMTP relay {}: {}", host, e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        };
        let builder = builder.port(smtp.port);
        let builder = match (smtp.user.as_deref(), smtp.password.as_deref()) {
            (Some(user), Some(password)) => {
                builder.credentials(Credentials::new(user.to_string(), password.to_string()))
            }
            _ => builder,
        };

        tracing::info!(
            host = %host,
            port = smtp.port,
            tls = smtp.tls,
            "E-mail share target initialized"
        );

        Ok(Self {
            mailer: Arc::new(builder.build()),
            from,
        })
    }

    /// Assemble the message: plain-text body plus the document as attachment.
    pub fn build_message(
        &self,
        request: &ShareRequest,
        attachment: Vec<u8>,
    ) -> Result<Message, ShareError> {
        let recipients: Vec<Mailbox> = request
            .recipients
            .iter()
            .filter_map(|raw| match raw.parse::<Mailbox>() {
                Ok(mailbox) => Some(mailbox),
                Err(err) => {
                    tracing::warn!(recipient = %raw, error = %err, "Skipping invalid recipient");
                    None
                }
            })
            .collect();
        if recipients.is_empty() {
            return Err(ShareError::NoRecipients(request.recipients.join(", ")));
        }

        let file_name = request
            .attachment
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ShareError::Attachment(format!(
                    "No file name in {}",
                    request.attachment.display()
                ))
            })?
            .to_string();
        let content_type = ContentType::parse(attachment_content_type(&request.attachment))
            .map_err(|e| ShareError::Attachment(e.to_string()))?;

        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(request.subject.clone());
        for mailbox in recipients {
            builder = builder.to(mailbox);
        }

        builder
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(request.message.clone()))
                    .singlepart(Attachment::new(file_name).body(attachment, content_type)),
            )
            .map_err(|e| ShareError::Transport(format!("Failed to build message: {}", e)))
    }
}

#[async_trait]
impl ShareTarget for EmailShare {
    async fn share(&self, request: &ShareRequest) -> Result<ShareOutcome, ShareError> {
        let attachment = tokio::fs::read(&request.attachment).await.map_err(|e| {
            ShareError::Attachment(format!("{}: {}", request.attachment.display(), e))
        })?;
        let message = self.build_message(request, attachment)?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| ShareError::Transport(e.to_string()))?;

        tracing::info!(
            title = %request.title,
            recipients = request.recipients.len(),
            "Document e-mailed"
        );
        Ok(ShareOutcome::Shared)
    }

    fn name(&self) -> &'static str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handover_core::HandoverConfig;
    use std::path::PathBuf;

    fn config(host: Option<&str>, from: Option<&str>) -> Config {
        let mut inner = HandoverConfig::default();
        inner.smtp.host = host.map(String::from);
        inner.smtp.from = from.map(String::from);
        inner.smtp.tls = false;
        Config(Box::new(inner))
    }

    fn request(recipients: &[&str]) -> ShareRequest {
        ShareRequest {
            title: "Předávací protokol - Novák".to_string(),
            subject: "Předávací protokol - Novák".to_string(),
            message: "Předávací protokol".to_string(),
            attachment: PathBuf::from("/tmp/predavaci_protokol_Novak_Jan.pdf"),
            recipients: recipients.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_from_config_requires_host_and_sender() {
        assert!(matches!(
            EmailShare::from_config(&config(None, Some("wizard@example.cz"))),
            Err(HandoverError::Config(_))
        ));
        assert!(matches!(
            EmailShare::from_config(&config(Some("localhost"), None)),
            Err(HandoverError::Config(_))
        ));
        assert!(matches!(
            EmailShare::from_config(&config(Some("localhost"), Some("not an address"))),
            Err(HandoverError::Config(_))
        ));
    }

    #[test]
    fn test_message_has_recipients_and_attachment() {
        let share =
            EmailShare::from_config(&config(Some("localhost"), Some("wizard@example.cz"))).unwrap();
        let message = share
            .build_message(
                &request(&["office@example.cz", "broken", "archive@example.cz"]),
                b"%PDF-1.4".to_vec(),
            )
            .unwrap();

        let to: Vec<String> = message
            .envelope()
            .to()
            .iter()
            .map(|a| a.to_string())
            .collect();
        assert_eq!(to, vec!["office@example.cz", "archive@example.cz"]);

        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains("application/pdf"));
        assert!(raw.contains("predavaci_protokol_Novak_Jan.pdf"));
    }

    #[test]
    fn test_no_valid_recipients() {
        let share =
            EmailShare::from_config(&config(Some("localhost"), Some("wizard@example.cz"))).unwrap();
        let err = share
            .build_message(&request(&["nope"]), Vec::new())
            .unwrap_err();
        assert!(matches!(err, ShareError::NoRecipients(ref r) if r == "nope"));

        let err = share.build_message(&request(&[]), Vec::new()).unwrap_err();
        assert!(matches!(err, ShareError::NoRecipients(_)));
    }

    #[tokio::test]
    async fn test_missing_attachment_fails_before_sending() {
        let share =
            EmailShare::from_config(&config(Some("localhost"), Some("wizard@example.cz"))).unwrap();
        let mut req = request(&["office@example.cz"]);
        req.attachment = PathBuf::from("/no/such/protocol.pdf");
        let err = share.share(&req).await.unwrap_err();
        assert!(matches!(err, ShareError::Attachment(_)));
    }

    #[test]
    fn test_attachment_content_types() {
        assert_eq!(attachment_content_type(Path::new("a.PDF")), "application/pdf");
        assert_eq!(
            attachment_content_type(Path::new("a.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            attachment_content_type(Path::new("a")),
            "application/octet-stream"
        );
    }
}
