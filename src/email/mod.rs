//! Outbound notification delivery.

pub mod mandrill;

pub use mandrill::MandrillClient;

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::webhook::OutboundNotification;

/// Submits a rendered notification to a transactional email API.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Send once. Returns the provider's parsed JSON response.
    async fn send(
        &self,
        notification: &OutboundNotification,
    ) -> Result<serde_json::Value, DeliveryError>;
}
