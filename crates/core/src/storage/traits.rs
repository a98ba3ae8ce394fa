//! Storage repository traits
//!
//! These traits define the storage interface the HTTP handlers depend on,
//! allowing for different implementations (SQLite, mock).

use crate::error::Result;
use crate::models::{Message, NewMessage, StatusRecord};

/// Message repository operations
pub trait MessageRepository {
    /// Append a message, returning it with its assigned id
    fn create_message(&self, message: &NewMessage) -> Result<Message>;

    /// List messages visible to a user, oldest first
    fn list_messages_for(&self, user: &str) -> Result<Vec<Message>>;
}

/// Status repository operations
pub trait StatusRepository {
    /// Insert or replace a user's status
    fn upsert_status(&self, record: &StatusRecord) -> Result<()>;

    /// Fetch stored statuses for the given users, omitting unknown names
    fn find_statuses(&self, users: &[String]) -> Result<Vec<StatusRecord>>;
}

/// Combined storage interface
pub trait Storage: MessageRepository + StatusRepository {}

impl<T> Storage for T where T: MessageRepository + StatusRepository {}
