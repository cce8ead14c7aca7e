//! Outbound mail transport seam.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use log::{debug, error};

use crate::errors::Result;

use super::messages::MailMessage;

/// Trait for outbound mail transports.
///
/// Domain flows treat mail as best-effort: messages are handed off on
/// detached tasks and delivery failures are logged, never surfaced.
#[async_trait]
pub trait MailerTrait: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Mailer that drops every message. Used when no relay is configured.
#[derive(Debug, Default, Clone)]
pub struct NoopMailer;

#[async_trait]
impl MailerTrait for NoopMailer {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<()> {
        debug!("Mail transport disabled, dropping \"{}\" to {}", subject, to);
        Ok(())
    }
}

/// A message captured by [`MockMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mailer that records messages in memory for assertions in tests.
#[derive(Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<SentMail>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl MailerTrait for MockMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Sends a message on a detached task. Delivery failures are logged and
/// never reach the caller.
pub fn send_detached(mailer: &Arc<dyn MailerTrait>, to: String, message: MailMessage) {
    let mailer = Arc::clone(mailer);
    tokio::spawn(async move {
        if let Err(e) = mailer.send(&to, &message.subject, &message.body).await {
            error!("Failed to send mail to {}: {}", to, e);
        }
    });
}
