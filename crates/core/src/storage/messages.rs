//! Message storage operations

use rusqlite::{params, Connection};
use tracing::warn;

use crate::error::Result;
use crate::models::{Message, NewMessage};
use crate::storage::parse::{format_datetime, parse_datetime};

pub struct MessageStore<'a> {
    conn: &'a Connection,
}

impl<'a> MessageStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Append a message and return it with its assigned id
    pub fn create(&self, message: &NewMessage) -> Result<Message> {
        self.conn.execute(
            "INSERT INTO messages (user, text, time, recipient) VALUES (?1, ?2, ?3, ?4)",
            params![
                message.sender,
                message.body,
                format_datetime(&message.created_at),
                message.recipient,
            ],
        )?;

        Ok(Message {
            id: self.conn.last_insert_rowid(),
            sender: message.sender.clone(),
            body: message.body.clone(),
            created_at: message.created_at,
            recipient: message.recipient.clone(),
        })
    }

    /// List every message visible to `user`, oldest first
    ///
    /// Visible means public, addressed to `user`, or written by `user`.
    /// Rows whose stored time cannot be read are logged and skipped.
    pub fn list_visible_to(&self, user: &str) -> Result<Vec<Message>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user, text, time, recipient
             FROM messages
             WHERE recipient = '' OR recipient IS NULL OR recipient = ?1 OR user = ?1
             ORDER BY id ASC",
        )?;

        let rows = stmt
            .query_map(params![user], Self::map_message)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows.into_iter().flatten().collect())
    }

    fn map_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Option<Message>> {
        let id: i64 = row.get(0)?;
        let time: String = row.get(3)?;
        let created_at = match parse_datetime(&time) {
            Ok(created_at) => created_at,
            Err(e) => {
                warn!(id, time = %time, error = %e, "Skipping message with unreadable time");
                return Ok(None);
            }
        };

        Ok(Some(Message {
            id,
            sender: row.get(1)?,
            body: row.get(2)?,
            created_at,
            recipient: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        }))
    }

    /// Get total message count
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
