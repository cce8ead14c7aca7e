//! HTTP relay mail transport.

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::{MailError, Result};

use super::mailer::MailerTrait;

/// Mailer that posts messages to a JSON relay endpoint.
pub struct HttpRelayMailer {
    client: reqwest::Client,
    relay_url: String,
    from: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl HttpRelayMailer {
    pub fn new(relay_url: String, from: String, api_key: Option<String>) -> Self {
        HttpRelayMailer {
            client: reqwest::Client::new(),
            relay_url,
            from,
            api_key,
        }
    }
}

#[async_trait]
impl MailerTrait for HttpRelayMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let message = RelayMessage {
            from: &self.from,
            to,
            subject,
            text: body,
        };

        let mut request = self.client.post(&self.relay_url).json(&message);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(MailError::from)?;
        if !response.status().is_success() {
            return Err(MailError::Rejected(response.status().as_u16()).into());
        }
        Ok(())
    }
}
