//! Mandrill `messages/send` client.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;

use super::EmailProvider;
use crate::config::MandrillConfig;
use crate::error::DeliveryError;
use crate::webhook::OutboundNotification;

const PROVIDER: &str = "Mandrill";

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    key: &'a str,
    message: Message<'a>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    from_email: &'a str,
    from_name: &'a str,
    to: [Recipient<'a>; 1],
    subject: &'a str,
    text: &'a str,
    html: &'a str,
    important: bool,
    track_opens: bool,
    track_clicks: bool,
    auto_text: bool,
    inline_css: bool,
}

#[derive(Debug, Serialize)]
struct Recipient<'a> {
    email: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
}

pub struct MandrillClient {
    api_key: SecretString,
    from_email: String,
    from_name: String,
    api_url: String,
    client: reqwest::Client,
}

impl MandrillClient {
    pub fn new(config: MandrillConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Share a connection pool with other clients.
    pub fn with_client(config: MandrillConfig, client: reqwest::Client) -> Self {
        Self {
            api_key: config.api_key,
            from_email: config.from_email,
            from_name: config.from_name,
            api_url: config.api_url,
            client,
        }
    }

    fn send_request<'a>(&'a self, notification: &'a OutboundNotification) -> SendRequest<'a> {
        SendRequest {
            key: self.api_key.expose_secret(),
            message: Message {
                from_email: &self.from_email,
                from_name: &self.from_name,
                to: [Recipient {
                    email: &notification.to,
                    kind: "to",
                }],
                subject: &notification.subject,
                text: &notification.text,
                html: &notification.html,
                important: true,
                track_opens: true,
                track_clicks: true,
                auto_text: true,
                inline_css: true,
            },
        }
    }
}

#[async_trait]
impl EmailProvider for MandrillClient {
    fn name(&self) -> &str {
        "mandrill"
    }

    async fn send(&self, notification: &OutboundNotification) -> Result<Value, DeliveryError> {
        let resp = self
            .client
            .post(&self.api_url)
            .json(&self.send_request(notification))
            .send()
            .await
            .map_err(|e| DeliveryError::RequestFailed {
                provider: PROVIDER.into(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| DeliveryError::RequestFailed {
                provider: PROVIDER.into(),
                reason: e.to_string(),
            })?;

        classify_response(status.as_u16(), &text)
    }
}

/// Parse first, then check status, so a non-JSON error page surfaces verbatim.
fn classify_response(status: u16, body: &str) -> Result<Value, DeliveryError> {
    let parsed: Value = serde_json::from_str(body).map_err(|_| DeliveryError::InvalidResponse {
        provider: PROVIDER.into(),
        body: body.to_string(),
    })?;

    if !(200..300).contains(&status) {
        return Err(DeliveryError::Api {
            provider: PROVIDER.into(),
            status,
            body: body.to_string(),
        });
    }

    for (email, status, reason) in rejected_recipients(&parsed) {
        tracing::warn!(
            email = %email,
            status = %status,
            reason = %reason,
            "Mandrill did not accept recipient"
        );
    }

    Ok(parsed)
}

/// `(email, status, reject_reason)` for every entry Mandrill did not queue or send.
fn rejected_recipients(response: &Value) -> Vec<(String, String, String)> {
    let Some(entries) = response.as_array() else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let status = entry.get("status")?.as_str()?;
            if !matches!(status, "rejected" | "invalid") {
                return None;
            }
            let field = |key: &str| {
                entry
                    .get(key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            Some((field("email"), status.to_string(), field("reject_reason")))
        })
        .collect()
}
