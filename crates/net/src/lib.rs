//! Buddy Network Library
//!
//! HTTP/JSON transport for the chat and presence service.
//!
//! # Endpoints
//!
//! - `POST /send` `{user, text, recipient?}`: append a message
//! - `GET /messages?user=NAME`: messages visible to `NAME`, oldest first
//! - `POST /status` `{user, status, message?}`: set a user's status
//! - `GET /status?users=A,B,C`: stored statuses for the listed users
//!
//! # Usage
//!
//! ```ignore
//! let db = Arc::new(Mutex::new(Database::open("chat.db")?));
//! let server = Server::start(([0, 0, 0, 0], DEFAULT_PORT).into(), db).await?;
//!
//! let client = Client::new(format!("http://{}", server.addr()));
//! client.set_status("alice", "Away", "brb").await?;
//! let statuses = client.get_statuses(&["alice".into(), "bob".into()]).await?;
//! ```

pub mod client;
pub mod error;
pub mod protocol;
pub mod server;

pub use client::Client;
pub use error::{ApiError, Error, Result};
pub use protocol::{MessagesQuery, SendRequest, StatusQuery, StatusRequest};
pub use server::{router, AppState, Server};

/// Default port for Buddy servers
pub const DEFAULT_PORT: u16 = 3000;
