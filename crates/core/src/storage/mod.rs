//! SQLite storage layer for Buddy

mod messages;
mod migrations;
mod parse;
mod statuses;
mod traits;

use crate::error::Result;
use crate::models::{Message, NewMessage, StatusRecord};
use rusqlite::Connection;
use std::path::Path;
use tracing::instrument;

pub use messages::MessageStore;
pub use statuses::StatusStore;
pub use traits::{MessageRepository, StatusRepository, Storage};

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        migrations::get_current_version(&self.conn).unwrap_or(0)
    }

    /// Get message store
    pub fn messages(&self) -> MessageStore<'_> {
        MessageStore::new(&self.conn)
    }

    /// Get status store
    pub fn statuses(&self) -> StatusStore<'_> {
        StatusStore::new(&self.conn)
    }
}

impl MessageRepository for Database {
    fn create_message(&self, message: &NewMessage) -> Result<Message> {
        self.messages().create(message)
    }

    fn list_messages_for(&self, user: &str) -> Result<Vec<Message>> {
        self.messages().list_visible_to(user)
    }
}

impl StatusRepository for Database {
    fn upsert_status(&self, record: &StatusRecord) -> Result<()> {
        self.statuses().upsert(record)
    }

    fn find_statuses(&self, users: &[String]) -> Result<Vec<StatusRecord>> {
        self.statuses().find_for_users(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat.db");

        {
            let db = Database::open(&path).unwrap();
            let message =
                NewMessage::new(Some("alice".into()), Some("persisted".into()), None).unwrap();
            db.create_message(&message).unwrap();
            db.upsert_status(&StatusRecord::new(Some("alice".into()), Some("Away".into()), None).unwrap())
                .unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.schema_version(), 2);
        assert_eq!(db.list_messages_for("bob").unwrap()[0].body, "persisted");
        assert_eq!(db.find_statuses(&["alice".to_string()]).unwrap().len(), 1);
    }

    #[test]
    fn test_latest_status_wins_through_trait() {
        let db = Database::open_in_memory().unwrap();
        let storage: &dyn Storage = &db;

        for (status, note) in [("Away", "brb"), ("Online", "")] {
            let record = StatusRecord::new(
                Some("alice".into()),
                Some(status.into()),
                Some(note.into()),
            )
            .unwrap();
            storage.upsert_status(&record).unwrap();
        }

        let found = storage.find_statuses(&["alice".to_string()]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].status, "Online");
        assert_eq!(found[0].message, "");
    }
}
