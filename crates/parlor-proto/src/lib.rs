//! Parlor wire protocol
//!
//! Types exchanged with the chat server over both transports: the REST API
//! (plain JSON bodies) and the real-time channel (named socket.io events
//! with one JSON argument each).
//!
//! # Components
//!
//! - [`ChatMessage`], [`Group`], [`UserSummary`], [`RoomMember`]: entities
//! - [`ClientEvent`]: events the client emits
//! - [`ServerEvent`]: events the server pushes

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod events;
mod types;

pub use errors::{ProtocolError, Result};
pub use events::{ClientEvent, ServerEvent};
pub use types::{ChatMessage, Group, MessageId, RoomMember, UserId, UserSummary};

/// Name of the room every identity is joined to.
pub const DEFAULT_ROOM: &str = "general";
