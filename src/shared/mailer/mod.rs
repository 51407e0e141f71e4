use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::config::Config;

#[derive(Debug, Error)]
pub enum MailerError {
  #[error("Transport error: {0}")]
  TransportError(#[from] reqwest::Error),

  #[error("Mail API rejected the message with status {0}")]
  Rejected(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailAddress {
  pub name: String,
  pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
  pub from: MailAddress,
  pub to: Vec<MailAddress>,
  pub subject: String,
  pub html: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailReceipt {
  /// Some providers only capture the message and hand back a link to look at it.
  #[serde(default, rename = "previewUrl")]
  pub preview_url: Option<String>,
}

pub trait Mailer {
  async fn send(&self, message: MailMessage) -> Result<MailReceipt, MailerError>;
}

/// Posts messages as JSON to the configured mail API. Without an endpoint
/// delivery is disabled and messages are only logged.
#[derive(Clone)]
pub struct MailerImpl {
  client: reqwest::Client,
  endpoint: Option<String>,
  api_key: Option<String>,
}

impl MailerImpl {
  pub fn new(config: &Config) -> Result<Self, MailerError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.mail_timeout_secs))
      .build()?;
    Ok(Self {
      client,
      endpoint: config.mail_api_url.clone(),
      api_key: config.mail_api_key.clone(),
    })
  }
}

impl Mailer for MailerImpl {
  async fn send(&self, message: MailMessage) -> Result<MailReceipt, MailerError> {
    let Some(endpoint) = &self.endpoint else {
      info!(
        "Mail delivery disabled, dropping \"{}\" to {:?}",
        message.subject,
        message.to.iter().map(|to| &to.email).collect::<Vec<_>>()
      );
      return Ok(MailReceipt::default());
    };

    let mut request = self.client.post(endpoint.as_str()).json(&message);
    if let Some(api_key) = &self.api_key {
      request = request.bearer_auth(api_key);
    }
    let response = request.send().await?;
    if !response.status().is_success() {
      return Err(MailerError::Rejected(response.status().as_u16()));
    }

    // An empty or non JSON body still means the message was accepted.
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body).unwrap_or_default())
  }
}
