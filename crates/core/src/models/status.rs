//! Presence status model

use std::fmt;

use serde::{Deserialize, Serialize};

use super::message::non_empty;
use crate::error::{Error, Result};

/// A user's self-reported status
///
/// One record per user. Writing a status replaces the previous record.
/// An empty `message` means no note was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub user: String,
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl StatusRecord {
    /// Validate a status submission. A missing note is stored as empty.
    pub fn new(user: Option<String>, status: Option<String>, message: Option<String>) -> Result<Self> {
        match (non_empty(user), non_empty(status)) {
            (Some(user), Some(status)) => Ok(Self {
                user,
                status,
                message: message.unwrap_or_default(),
            }),
            _ => Err(Error::Validation(
                "User and status are required.".to_string(),
            )),
        }
    }

    pub fn presence(&self) -> Presence {
        Presence::from(self.status.as_str())
    }
}

/// Interpreted status value
///
/// The store accepts any text; the well-known values get their own variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Presence {
    Online,
    Away,
    Invisible,
    /// No record stored for the user
    Offline,
    Custom(String),
}

impl Presence {
    /// Lowercase class name used when rendering a roster entry
    pub fn class(&self) -> String {
        self.to_string().to_lowercase()
    }

    pub fn is_away(&self) -> bool {
        matches!(self, Presence::Away)
    }
}

impl From<&str> for Presence {
    fn from(value: &str) -> Self {
        match value {
            "Online" => Presence::Online,
            "Away" => Presence::Away,
            "Invisible" => Presence::Invisible,
            "Offline" => Presence::Offline,
            other => Presence::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Presence::Online => write!(f, "Online"),
            Presence::Away => write!(f, "Away"),
            Presence::Invisible => write!(f, "Invisible"),
            Presence::Offline => write!(f, "Offline"),
            Presence::Custom(text) => write!(f, "{}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_requires_user_and_status() {
        let err = StatusRecord::new(Some("alice".into()), None, None).unwrap_err();
        assert_eq!(err.to_string(), "User and status are required.");
        assert!(StatusRecord::new(Some(String::new()), Some("Online".into()), None).is_err());
    }

    #[test]
    fn test_missing_message_is_empty() {
        let record = StatusRecord::new(Some("alice".into()), Some("Online".into()), None).unwrap();
        assert_eq!(record.message, "");
    }

    #[test]
    fn test_presence_parsing() {
        assert_eq!(Presence::from("Away"), Presence::Away);
        assert_eq!(Presence::from("coding"), Presence::Custom("coding".into()));
        assert_eq!(Presence::from("Invisible").class(), "invisible");
        assert_eq!(Presence::Custom("At Lunch".into()).class(), "at lunch");
    }
}
