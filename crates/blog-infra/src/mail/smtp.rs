use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use blog_core::error::MailError;
use blog_core::ports::{Mailer, OutgoingMail};

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Delivers mail through an SMTP relay using STARTTLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        tracing::info!(host = %config.host, port = config.port, "SMTP transport configured");
        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|e| MailError::Address(format!("{address}: {e}")))
}

/// Build the MIME message for an outgoing mail.
pub(crate) fn build_message(mail: OutgoingMail) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(mailbox(&mail.from)?)
        .subject(mail.subject)
        .header(ContentType::TEXT_PLAIN);
    for to in &mail.to {
        builder = builder.to(mailbox(to)?);
    }

    builder
        .body(mail.body)
        .map_err(|e| MailError::Build(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = build_message(mail)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(from: &str, to: &[&str]) -> OutgoingMail {
        OutgoingMail {
            subject: "Ada recommends you read Notes".to_string(),
            body: "Read Notes at http://localhost/".to_string(),
            from: from.to_string(),
            to: to.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_build_message_uses_submitter_as_sender() {
        let message = build_message(mail("ada@example.com", &["bob@example.com"])).unwrap();
        let envelope = message.envelope();

        assert_eq!(
            envelope.from().map(|a| a.to_string()),
            Some("ada@example.com".to_string())
        );
        assert_eq!(envelope.to().len(), 1);
    }

    #[test]
    fn test_build_message_rejects_bad_address() {
        let result = build_message(mail("not an address", &["bob@example.com"]));
        assert!(matches!(result, Err(MailError::Address(_))));
    }

    #[test]
    fn test_build_message_requires_recipient() {
        let result = build_message(mail("ada@example.com", &[]));
        assert!(matches!(result, Err(MailError::Build(_))));
    }
}
