//! Buddy Core Library
//!
//! Models, validation, SQLite storage, and the client-local roster state for
//! the Buddy chat service.

pub mod away;
pub mod error;
pub mod models;
pub mod roster;
pub mod storage;

pub use away::{AwayBanner, DEFAULT_AWAY_MESSAGE};
pub use error::{Error, Result};
pub use models::*;
pub use roster::{AddBuddy, BuddyEntry, Roster, DEFAULT_BUDDIES};
pub use storage::{Database, MessageRepository, StatusRepository, Storage};
