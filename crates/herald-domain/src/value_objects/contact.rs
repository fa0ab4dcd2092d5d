//! Contact details and delivery channels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery channel a notification can travel over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Electronic mail
    Mail,
    /// Text message
    Sms,
}

impl Channel {
    /// All channels in a stable order
    pub const ALL: [Channel; 2] = [Channel::Mail, Channel::Sms];

    /// Lower-case channel name, used for log fields and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mail => "mail",
            Self::Sms => "sms",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person reachable over zero or more channels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Display name
    pub name: String,
    /// Mail address, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number for text messages, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Contact {
    /// Contact with a name only
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
        }
    }

    /// Attach a mail address
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Attach a phone number
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Address for the given channel, ignoring blank values
    pub fn address_for(&self, channel: Channel) -> Option<&str> {
        let address = match channel {
            Channel::Mail => self.email.as_deref(),
            Channel::Sms => self.phone.as_deref(),
        };
        address.map(str::trim).filter(|a| !a.is_empty())
    }

    /// Whether the contact can be reached at all
    pub fn is_reachable(&self) -> bool {
        Channel::ALL
            .iter()
            .any(|channel| self.address_for(*channel).is_some())
    }
}
