//! Values exchanged between the components of a run

use crate::error::{Error, Result};
use serde::Serialize;
use std::net::Ipv4Addr;

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordType {
    /// IPv4 address record
    A,
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS zone hosted by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    /// Provider-side zone identifier
    pub id: String,
    /// Zone name, e.g. "example.com"
    pub name: String,
}

/// A DNS record as the provider reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// Provider-side record identifier
    pub id: String,
    /// Fully-qualified record name
    pub name: String,
    /// Record content; for `A` records the IP address as text
    pub content: String,
}

/// The caller's public IP address, as reported by the lookup service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicIp(String);

impl PublicIp {
    /// Wrap a reported address
    ///
    /// The text must parse as an IPv4 address, since only `A` records are
    /// managed. It is kept verbatim so it can be compared with the record
    /// content as a string.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.parse::<Ipv4Addr>().is_err() {
            return Err(Error::invalid_input(format!(
                "Public IP lookup returned an invalid IPv4 address: '{raw}'"
            )));
        }
        Ok(Self(raw))
    }

    /// The address as text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PublicIp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload of a record update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordUpdate {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub name: String,
    pub content: String,
}

impl RecordUpdate {
    /// Point an `A` record at a new address
    pub fn a_record(name: impl Into<String>, ip: &PublicIp) -> Self {
        Self {
            record_type: RecordType::A,
            name: name.into(),
            content: ip.as_str().to_string(),
        }
    }
}

/// What the provider said about an update
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateResponse {
    /// The provider's own success flag
    pub success: bool,
    /// Error messages reported alongside a failure
    pub errors: Vec<String>,
}

/// A push notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub title: String,
    pub body: String,
}

impl NotificationMessage {
    /// Sent after a successful update
    pub fn update_succeeded() -> Self {
        Self {
            title: "DNS Updated".to_string(),
            body: "DNS updated with Cloud Flare successfully!".to_string(),
        }
    }

    /// Sent after a failed update
    pub fn update_failed() -> Self {
        Self {
            title: "DNS Update FAILED!".to_string(),
            body: "DNS could not be updated with Cloud Flare. Check it out.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_ip_validation() {
        assert_eq!(PublicIp::parse("203.0.113.7").unwrap().as_str(), "203.0.113.7");
        assert!(PublicIp::parse("2001:db8::1").is_err());
        assert!(PublicIp::parse("").is_err());
        assert!(PublicIp::parse("not-an-ip").is_err());
        assert!(PublicIp::parse("203.0.113.7 ").is_err());
    }

    #[test]
    fn test_record_update_wire_format() {
        let ip = PublicIp::parse("5.6.7.8").unwrap();
        let update = RecordUpdate::a_record("home.example.com", &ip);

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({
                "type": "A",
                "name": "home.example.com",
                "content": "5.6.7.8"
            })
        );
    }

    #[test]
    fn test_notification_messages() {
        assert_eq!(NotificationMessage::update_succeeded().title, "DNS Updated");
        assert_eq!(NotificationMessage::update_failed().title, "DNS Update FAILED!");
    }
}
