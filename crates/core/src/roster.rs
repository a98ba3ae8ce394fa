//! Client-local buddy roster
//!
//! The roster lives only in client memory. It is seeded at startup, grows
//! through [`Roster::add`], and is never written to the server. A restart
//! brings back the seed list and nothing else.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Presence, StatusRecord};

/// Names every roster starts with unless configured otherwise
pub const DEFAULT_BUDDIES: &[&str] = &["Guest", "Buddy1", "TestUser"];

/// Result of adding a buddy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddBuddy {
    Added,
    AlreadyPresent,
}

/// One rendered roster row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuddyEntry {
    pub name: String,
    pub presence: Presence,
    pub message: String,
}

impl BuddyEntry {
    /// Hover text: `Status: note` when a note is set, otherwise just the status
    pub fn title(&self) -> String {
        if self.message.is_empty() {
            self.presence.to_string()
        } else {
            format!("{}: {}", self.presence, self.message)
        }
    }

    pub fn css_class(&self) -> String {
        format!("status-{}", self.presence.class())
    }
}

/// Ordered, duplicate-free list of buddy names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    buddies: Vec<String>,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(DEFAULT_BUDDIES.iter().copied())
    }
}

impl Roster {
    /// Seed a roster. Blank and repeated names are dropped.
    pub fn new<I, S>(seed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self { buddies: Vec::new() };
        for name in seed {
            let name = name.as_ref().trim();
            if !name.is_empty() && !roster.contains(name) {
                roster.buddies.push(name.to_string());
            }
        }
        roster
    }

    pub fn names(&self) -> &[String] {
        &self.buddies
    }

    pub fn len(&self) -> usize {
        self.buddies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buddies.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.buddies.iter().any(|b| b == name)
    }

    /// Add a buddy by screen name (surrounding whitespace ignored)
    pub fn add(&mut self, name: &str) -> Result<AddBuddy> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation(
                "Please enter a screen name to add.".to_string(),
            ));
        }

        if self.contains(name) {
            warn!(buddy = name, "Buddy is already on the list");
            return Ok(AddBuddy::AlreadyPresent);
        }

        self.buddies.push(name.to_string());
        debug!(buddy = name, count = self.buddies.len(), "Added buddy");
        Ok(AddBuddy::Added)
    }

    /// Pair each buddy with its fetched status, defaulting to Offline
    pub fn entries(&self, statuses: &[StatusRecord]) -> Vec<BuddyEntry> {
        let by_user: HashMap<&str, &StatusRecord> =
            statuses.iter().map(|s| (s.user.as_str(), s)).collect();

        self.buddies
            .iter()
            .map(|name| match by_user.get(name.as_str()) {
                Some(record) => BuddyEntry {
                    name: name.clone(),
                    presence: record.presence(),
                    message: record.message.clone(),
                },
                None => BuddyEntry {
                    name: name.clone(),
                    presence: Presence::Offline,
                    message: String::new(),
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_seed() {
        let roster = Roster::default();
        assert_eq!(roster.names(), ["Guest", "Buddy1", "TestUser"]);
    }

    #[test]
    fn test_add_buddy() {
        let mut roster = Roster::default();

        assert_eq!(roster.add("  Carol ").unwrap(), AddBuddy::Added);
        assert_eq!(roster.add("Carol").unwrap(), AddBuddy::AlreadyPresent);
        assert_eq!(roster.len(), 4);
        assert_eq!(roster.names().last().unwrap(), "Carol");
    }

    #[test]
    fn test_add_blank_name_rejected() {
        let mut roster = Roster::default();
        let err = roster.add("   ").unwrap_err();
        assert_eq!(err.to_string(), "Please enter a screen name to add.");
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn test_seed_drops_blanks_and_duplicates() {
        let roster = Roster::new(["alice", "", "alice", "bob"]);
        assert_eq!(roster.names(), ["alice", "bob"]);
    }

    #[test]
    fn test_entries_default_to_offline() {
        let roster = Roster::new(["A", "Z"]);
        let statuses = vec![StatusRecord {
            user: "A".into(),
            status: "Away".into(),
            message: "brb".into(),
        }];

        let entries = roster.entries(&statuses);
        assert_eq!(entries[0].presence, Presence::Away);
        assert_eq!(entries[0].title(), "Away: brb");
        assert_eq!(entries[0].css_class(), "status-away");
        assert_eq!(entries[1].presence, Presence::Offline);
        assert_eq!(entries[1].title(), "Offline");
    }

    #[test]
    fn test_entries_ignore_statuses_for_non_buddies() {
        let roster = Roster::new(["A"]);
        let statuses = vec![StatusRecord {
            user: "stranger".into(),
            status: "Online".into(),
            message: String::new(),
        }];

        let entries = roster.entries(&statuses);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].presence, Presence::Offline);
    }
}
