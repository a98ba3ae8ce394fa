//! Chat message model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Recipient value marking a message as public
pub const PUBLIC_RECIPIENT: &str = "";

/// A stored chat message
///
/// Messages are immutable once written. `id` is assigned by the store and
/// strictly increases in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    #[serde(rename = "user")]
    pub sender: String,
    #[serde(rename = "text")]
    pub body: String,
    #[serde(rename = "time")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub recipient: String,
}

impl Message {
    pub fn is_public(&self) -> bool {
        self.recipient == PUBLIC_RECIPIENT
    }

    /// Whether `user` is allowed to see this message in their history
    pub fn is_visible_to(&self, user: &str) -> bool {
        self.is_public() || self.recipient == user || self.sender == user
    }

    pub fn format_timestamp(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }
}

/// A validated message that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender: String,
    pub body: String,
    pub recipient: String,
    pub created_at: DateTime<Utc>,
}

impl NewMessage {
    /// Validate a submission and stamp it with the current time.
    ///
    /// A missing recipient is stored as [`PUBLIC_RECIPIENT`].
    pub fn new(sender: Option<String>, body: Option<String>, recipient: Option<String>) -> Result<Self> {
        let (sender, body) = match (non_empty(sender), non_empty(body)) {
            (Some(sender), Some(body)) => (sender, body),
            _ => return Err(Error::Validation("User and text are required.".to_string())),
        };

        Ok(Self {
            sender,
            body,
            recipient: recipient.unwrap_or_default(),
            created_at: Utc::now(),
        })
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(sender: &str, recipient: &str) -> Message {
        Message {
            id: 1,
            sender: sender.to_string(),
            body: "hello".to_string(),
            created_at: Utc::now(),
            recipient: recipient.to_string(),
        }
    }

    #[test]
    fn test_new_message_requires_sender_and_body() {
        let err = NewMessage::new(None, Some("hi".into()), None).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "User and text are required.");

        assert!(NewMessage::new(Some("alice".into()), Some(String::new()), None).is_err());
        assert!(NewMessage::new(Some(String::new()), Some("hi".into()), None).is_err());
    }

    #[test]
    fn test_missing_recipient_is_public() {
        let msg = NewMessage::new(Some("alice".into()), Some("hi".into()), None).unwrap();
        assert_eq!(msg.recipient, PUBLIC_RECIPIENT);
    }

    #[test]
    fn test_visibility() {
        let public = message("alice", "");
        assert!(public.is_visible_to("bob"));

        let private = message("alice", "carol");
        assert!(!private.is_visible_to("bob"));
        assert!(private.is_visible_to("carol"));
        assert!(private.is_visible_to("alice"));
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(message("alice", "carol")).unwrap();
        assert_eq!(json["user"], "alice");
        assert_eq!(json["text"], "hello");
        assert_eq!(json["recipient"], "carol");
        assert!(json["time"].is_string());
    }
}
