// src/services/notifier.rs

//! Email notifier.
//!
//! Credentials are checked before anything touches the network; a missing
//! sender, secret or recipient is a configuration error.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::EmailConfig;

/// A rendered notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub html_body: String,
}

/// Delivers a notification to the configured recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<()>;
}

/// Sender identity, sender secret, and recipient, as read from the environment.
#[derive(Debug, Clone, Default)]
pub struct EmailCredentials {
    pub sender: Option<String>,
    pub secret: Option<String>,
    pub recipient: Option<String>,
}

impl EmailCredentials {
    pub const SENDER_VAR: &'static str = "GMAIL_EMAIL";
    pub const SECRET_VAR: &'static str = "GMAIL_APP_PASSWORD";
    pub const RECIPIENT_VAR: &'static str = "RECIPIENT_EMAIL";

    /// Read credentials from the process environment. Empty values count as absent.
    pub fn from_env() -> Self {
        let var = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            sender: var(Self::SENDER_VAR),
            secret: var(Self::SECRET_VAR),
            recipient: var(Self::RECIPIENT_VAR),
        }
    }

    /// Names of the variables that are missing.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.sender.is_none() {
            missing.push(Self::SENDER_VAR);
        }
        if self.secret.is_none() {
            missing.push(Self::SECRET_VAR);
        }
        if self.recipient.is_none() {
            missing.push(Self::RECIPIENT_VAR);
        }
        missing
    }

    /// Fail with a configuration error unless all three values are present.
    pub fn require(&self) -> Result<(&str, &str, &str)> {
        match (&self.sender, &self.secret, &self.recipient) {
            (Some(sender), Some(secret), Some(recipient)) => Ok((sender, secret, recipient)),
            _ => Err(AppError::config(format!(
                "Email credentials missing. Required environment variables: {}",
                self.missing().join(", ")
            ))),
        }
    }
}

/// Relay connection settings plus login.
#[derive(Debug, Clone)]
pub struct RelayLogin {
    pub relay: String,
    pub port: u16,
    pub username: String,
    pub secret: String,
}

/// Sends a built message over the network.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, login: &RelayLogin, message: Message) -> Result<()>;
}

/// STARTTLS submission through `lettre`.
///
/// A fresh connection is opened per send and dropped when it completes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpTransport;

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, login: &RelayLogin, message: Message) -> Result<()> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&login.relay)
            .map_err(AppError::transport)?
            .port(login.port)
            .credentials(Credentials::new(
                login.username.clone(),
                login.secret.clone(),
            ))
            .build();

        mailer.send(message).await.map_err(classify_smtp_error)?;
        Ok(())
    }
}

/// Authentication rejections are reported separately from other failures.
fn classify_smtp_error(err: lettre::transport::smtp::Error) -> AppError {
    let auth_rejected = err
        .status()
        .is_some_and(|code| code.to_string().starts_with("535"));
    if auth_rejected {
        AppError::auth(err)
    } else {
        AppError::transport(err)
    }
}

/// Email notifier over an authenticated relay.
pub struct SmtpNotifier<T: MailTransport = SmtpTransport> {
    config: EmailConfig,
    credentials: EmailCredentials,
    transport: T,
}

impl SmtpNotifier<SmtpTransport> {
    pub fn new(config: EmailConfig, credentials: EmailCredentials) -> Self {
        Self::with_transport(config, credentials, SmtpTransport)
    }
}

impl<T: MailTransport> SmtpNotifier<T> {
    pub fn with_transport(config: EmailConfig, credentials: EmailCredentials, transport: T) -> Self {
        Self {
            config,
            credentials,
            transport,
        }
    }

    /// Build the multipart message with a single HTML part.
    fn build_message(
        &self,
        sender: &str,
        recipient: &str,
        notification: &Notification,
    ) -> Result<Message> {
        let from: Mailbox = sender
            .parse()
            .map_err(|e| AppError::config(format!("Invalid sender address '{sender}': {e}")))?;
        let to: Mailbox = recipient.parse().map_err(|e| {
            AppError::config(format!("Invalid recipient address '{recipient}': {e}"))
        })?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(notification.subject.as_str())
            .multipart(
                MultiPart::alternative()
                    .singlepart(SinglePart::html(notification.html_body.clone())),
            )
            .map_err(AppError::transport)
    }
}

#[async_trait]
impl<T: MailTransport> Notifier for SmtpNotifier<T> {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        let (sender, secret, recipient) = self.credentials.require()?;
        let message = self.build_message(sender, recipient, notification)?;

        let login = RelayLogin {
            relay: self.config.relay.clone(),
            port: self.config.port,
            username: sender.to_string(),
            secret: secret.to_string(),
        };

        self.transport.send(&login, message).await?;
        log::info!("Email notification sent to {}", recipient);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default, Clone)]
    struct CountingTransport {
        calls: Arc<AtomicUsize>,
        sent: Arc<std::sync::Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl MailTransport for CountingTransport {
        async fn send(&self, login: &RelayLogin, message: Message) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(login.port, 587);
            let raw = String::from_utf8_lossy(&message.formatted()).to_string();
            self.sent.lock().unwrap().push(raw);
            Ok(())
        }
    }

    fn credentials() -> EmailCredentials {
        EmailCredentials {
            sender: Some("tracker@example.com".to_string()),
            secret: Some("app-secret".to_string()),
            recipient: Some("reader@example.com".to_string()),
        }
    }

    fn notification() -> Notification {
        Notification {
            subject: "US Trends Summary - Nov 14, 05:13 PM EST".to_string(),
            html_body: "<html><body>Storm</body></html>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_recipient_fails_before_network() {
        let transport = CountingTransport::default();
        let creds = EmailCredentials {
            recipient: None,
            ..credentials()
        };
        let notifier =
            SmtpNotifier::with_transport(EmailConfig::default(), creds, transport.clone());

        let err = notifier.notify(&notification()).await.unwrap_err();

        assert!(err.is_config());
        assert!(err.to_string().contains("RECIPIENT_EMAIL"));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_address_fails_before_network() {
        let transport = CountingTransport::default();
        let creds = EmailCredentials {
            recipient: Some("not an address".to_string()),
            ..credentials()
        };
        let notifier =
            SmtpNotifier::with_transport(EmailConfig::default(), creds, transport.clone());

        assert!(notifier.notify(&notification()).await.unwrap_err().is_config());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sends_single_html_message() {
        let transport = CountingTransport::default();
        let notifier =
            SmtpNotifier::with_transport(EmailConfig::default(), credentials(), transport.clone());

        notifier.notify(&notification()).await.unwrap();

        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        let sent = transport.sent.lock().unwrap();
        assert!(sent[0].contains("Subject: US Trends Summary - Nov 14, 05:13 PM EST"));
        assert!(sent[0].contains("multipart/alternative"));
        assert!(sent[0].contains("text/html"));
        assert!(sent[0].contains("To: reader@example.com"));
    }

    #[test]
    fn test_missing_lists_every_absent_variable() {
        let creds = EmailCredentials::default();
        assert_eq!(
            creds.missing(),
            vec!["GMAIL_EMAIL", "GMAIL_APP_PASSWORD", "RECIPIENT_EMAIL"]
        );
        assert!(credentials().require().is_ok());
    }
}
