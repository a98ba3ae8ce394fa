//! Data models for Buddy

mod message;
mod status;

pub use message::*;
pub use status::*;
