//! Presence status storage layer
//!
//! Each user has at most one row. Setting a status replaces the status and
//! the note together; no history is kept.

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::StatusRecord;
use crate::storage::parse::OptionalExt;

/// Status storage operations
pub struct StatusStore<'a> {
    conn: &'a Connection,
}

impl<'a> StatusStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert or fully replace the status for `record.user`
    pub fn upsert(&self, record: &StatusRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO status (user, status, message)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(user) DO UPDATE SET
                status = excluded.status,
                message = excluded.message",
            params![record.user, record.status, record.message],
        )?;

        Ok(())
    }

    /// Get the status for a single user (if set)
    pub fn get(&self, user: &str) -> Result<Option<StatusRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT user, status, message FROM status WHERE user = ?1",
                params![user],
                Self::map_status,
            )
            .optional()?;

        Ok(record)
    }

    /// Get statuses for several users (batch query for the roster)
    ///
    /// Users without a stored row are left out of the result.
    pub fn find_for_users(&self, users: &[String]) -> Result<Vec<StatusRecord>> {
        if users.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders: Vec<&str> = users.iter().map(|_| "?").collect();
        let sql = format!(
            "SELECT user, status, message FROM status WHERE user IN ({}) ORDER BY user",
            placeholders.join(", ")
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let statuses = stmt
            .query_map(rusqlite::params_from_iter(users.iter()), Self::map_status)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(statuses)
    }

    fn map_status(row: &rusqlite::Row<'_>) -> rusqlite::Result<StatusRecord> {
        Ok(StatusRecord {
            user: row.get(0)?,
            status: row.get(1)?,
            message: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        })
    }

    /// Number of users with a stored status
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM status", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    fn record(user: &str, status: &str, message: &str) -> StatusRecord {
        StatusRecord {
            user: user.to_string(),
            status: status.to_string(),
            message: message.to_string(),
        }
    }

    fn names(users: &[&str]) -> Vec<String> {
        users.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn test_set_and_get_status() {
        let db = Database::open_in_memory().unwrap();
        let store = db.statuses();

        assert!(store.get("alice").unwrap().is_none());

        store.upsert(&record("alice", "Online", "")).unwrap();

        let status = store.get("alice").unwrap().unwrap();
        assert_eq!(status.status, "Online");
        assert_eq!(status.message, "");
    }

    #[test]
    fn test_upsert_replaces() {
        let db = Database::open_in_memory().unwrap();
        let store = db.statuses();

        store.upsert(&record("alice", "Away", "lunch")).unwrap();
        store.upsert(&record("alice", "Online", "")).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.get("alice").unwrap().unwrap(), record("alice", "Online", ""));
    }

    #[test]
    fn test_missing_users_omitted() {
        let db = Database::open_in_memory().unwrap();
        let store = db.statuses();

        store.upsert(&record("A", "Away", "brb")).unwrap();

        let found = store.find_for_users(&names(&["A", "Z"])).unwrap();
        assert_eq!(found, vec![record("A", "Away", "brb")]);
    }

    #[test]
    fn test_empty_lookup() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.statuses().find_for_users(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_free_form_status_accepted() {
        let db = Database::open_in_memory().unwrap();
        let store = db.statuses();

        store.upsert(&record("bob", "In a meeting", "")).unwrap();
        store.upsert(&record("carol", "Invisible", "")).unwrap();

        let found = store.find_for_users(&names(&["carol", "bob"])).unwrap();
        let users: Vec<&str> = found.iter().map(|r| r.user.as_str()).collect();
        assert_eq!(users, vec!["bob", "carol"]);
        assert_eq!(found[0].status, "In a meeting");
    }
}
