//! Notification port for best-effort outbound messages
//!
//! One implementation per channel. All channels share this shape so a
//! handler can hold a list of ports and iterate without branching on the
//! channel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use herald_domain::Channel;
use serde::{Deserialize, Serialize};

/// Message handed to a notification port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub channel: Channel,
    /// Channel-specific address (mail address, phone number)
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl NotificationMessage {
    pub fn new(
        channel: Channel,
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Acknowledgement returned by a port after a successful send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub channel: Channel,
    pub recipient: String,
    pub accepted_at: DateTime<Utc>,
    /// Identifier assigned by the provider, if any
    pub provider_reference: Option<String>,
}

/// Notification delivery errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    /// The provider refused the message; sending it again will not help
    #[error("{channel} provider rejected message to {recipient}: {reason}")]
    Rejected {
        channel: Channel,
        recipient: String,
        reason: String,
    },

    /// The provider could not be reached or failed temporarily
    #[error("{channel} provider unavailable: {reason}")]
    Unavailable { channel: Channel, reason: String },

    /// The attempt did not complete in time
    #[error("{channel} delivery timed out after {elapsed_ms}ms")]
    Timeout { channel: Channel, elapsed_ms: u64 },

    /// A side effect that is not tied to a channel did not complete in time
    #[error("side effect timed out after {elapsed_ms}ms")]
    TaskTimeout { elapsed_ms: u64 },

    /// Message addressed to a different channel than the port serves
    #[error("message for {actual} handed to {expected} port")]
    ChannelMismatch { expected: Channel, actual: Channel },
}

impl NotificationError {
    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::Timeout { .. } | Self::TaskTimeout { .. }
        )
    }
}

/// Outbound channel contract
#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Channel served by this port
    fn channel(&self) -> Channel;

    /// Deliver one message
    async fn send(&self, message: &NotificationMessage)
    -> Result<DeliveryReceipt, NotificationError>;
}
