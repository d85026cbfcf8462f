use async_trait::async_trait;
use serde::Serialize;

use crate::domain::notification::{NotificationError, NotificationGateway};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
  from: &'a str,
  to: [&'a str; 1],
  subject: &'a str,
  text: &'a str,
}

/// Resend implementation of the NotificationGateway trait.
///
/// Without an API key the gateway reports `NotConfigured` on every delivery,
/// which routes codes into the fallback log. That is the intended local
/// development mode, not an error state.
pub struct ResendGateway {
  client: reqwest::Client,
  api_key: Option<String>,
  from_address: String,
}

impl ResendGateway {
  pub fn new(api_key: Option<String>, from_address: String) -> Self {
    Self {
      client: reqwest::Client::new(),
      api_key,
      from_address,
    }
  }
}

#[async_trait]
impl NotificationGateway for ResendGateway {
  async fn deliver(
    &self,
    address: &str,
    subject: &str,
    body: &str,
  ) -> Result<(), NotificationError> {
    let api_key = self
      .api_key
      .as_deref()
      .ok_or(NotificationError::NotConfigured)?;

    let request = SendEmailRequest {
      from: &self.from_address,
      to: [address],
      subject,
      text: body,
    };

    let response = self
      .client
      .post(RESEND_API_URL)
      .bearer_auth(api_key)
      .json(&request)
      .send()
      .await
      .map_err(|e| NotificationError::DeliveryFailed(e.to_string()))?;

    if !response.status().is_success() {
      let status = response.status();
      let detail = response.text().await.unwrap_or_default();
      return Err(NotificationError::DeliveryFailed(format!(
        "Resend returned {status}: {detail}"
      )));
    }

    Ok(())
  }
}
