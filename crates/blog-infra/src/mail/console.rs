use async_trait::async_trait;

use blog_core::error::MailError;
use blog_core::ports::{Mailer, OutgoingMail};

/// Writes messages to the log instead of delivering them.
#[derive(Debug, Default, Clone)]
pub struct ConsoleMailer;

impl ConsoleMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        if mail.to.is_empty() {
            return Err(MailError::Address("no recipients".to_string()));
        }

        tracing::info!(
            from = %mail.from,
            to = %mail.to.join(", "),
            subject = %mail.subject,
            body = %mail.body,
            "Email (console backend)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_requires_recipient() {
        let mail = OutgoingMail {
            subject: "s".to_string(),
            body: "b".to_string(),
            from: "a@example.com".to_string(),
            to: vec![],
        };

        let result = ConsoleMailer::new().send(mail.clone()).await;
        assert!(matches!(result, Err(MailError::Address(_))));

        let mail = OutgoingMail {
            to: vec!["b@example.com".to_string()],
            ..mail
        };
        assert!(ConsoleMailer::new().send(mail).await.is_ok());
    }
}
