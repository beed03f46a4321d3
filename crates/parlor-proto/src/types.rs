//! Chat entities shared by the REST API and the real-time channel.
//!
//! Field names match the server's JSON exactly (snake case), so these types
//! decode both `GET /rooms/{room}/messages` bodies and `chat` pushes.

use serde::{Deserialize, Serialize};

/// Server-assigned message id. Unique across all rooms and threads.
pub type MessageId = u64;

/// Server-assigned user id. Not stable across reconnects.
pub type UserId = String;

/// A group or private chat message.
///
/// A message is either a group message (routed by `room`) or a private
/// message (routed by the author/recipient pair), never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Globally unique message id.
    pub id: MessageId,
    /// Room name. For private messages this is a server-internal `dm:` key.
    #[serde(default)]
    pub room: String,
    /// Author display name.
    pub author: String,
    /// Author user id.
    pub author_id: UserId,
    /// Recipient display name (private messages only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    /// Recipient user id (private messages only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<UserId>,
    /// Message text.
    pub content: String,
    /// Private message flag.
    #[serde(default)]
    pub is_private: bool,
    /// Creation timestamp as sent by the server (RFC 3339).
    #[serde(default)]
    pub created_at: String,
}

impl ChatMessage {
    /// Peer of a private message as seen by `me`.
    ///
    /// `None` when `me` is neither author nor recipient, or when the other
    /// side is missing.
    pub fn peer_of(&self, me: &str) -> Option<&str> {
        let peer = if self.author_id == me {
            self.recipient_id.as_deref()?
        } else if self.recipient_id.as_deref() == Some(me) {
            self.author_id.as_str()
        } else {
            return None;
        };

        if peer.is_empty() { None } else { Some(peer) }
    }
}

/// A named group chat room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Server-assigned room id.
    pub id: u64,
    /// Unique room name.
    pub name: String,
    /// Creation timestamp as sent by the server (RFC 3339).
    #[serde(default)]
    pub created_at: String,
}

/// An online identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserSummary {
    /// User id.
    pub id: UserId,
    /// Display name.
    pub name: String,
}

impl UserSummary {
    /// Create a user summary.
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// Someone who has joined a room, with their current online flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMember {
    /// User id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Whether the member currently has a live connection in the room.
    #[serde(default)]
    pub is_online: bool,
}
