//! Real-time channel events.
//!
//! The channel is a socket.io connection. Each event is a name plus a single
//! JSON argument whose shape is determined by that name. Events are split by
//! direction into [`ClientEvent`] (emitted by us) and [`ServerEvent`] (pushed
//! by the server); both convert to and from `(name, data)` parts, which is
//! what the socket.io client hands over.
//!
//! # Invariants
//!
//! Each variant maps to exactly one event name (enforced by exhaustive
//! `match`). Decoding the parts produced by `into_parts` yields the same
//! value.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    ChatMessage, Group, RoomMember, UserSummary,
    errors::{ProtocolError, Result},
};

fn payload<T: DeserializeOwned>(event: &str, data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|source| ProtocolError::InvalidPayload { event: event.to_string(), source })
}

/// Payload of `join`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinPayload {
    /// Room to join.
    pub room: String,
    /// Display name to register under.
    pub name: String,
}

/// Payload of outbound `chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    /// Target room.
    pub room: String,
    /// Message text.
    pub content: String,
}

/// Payload of outbound `private`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivatePayload {
    /// Recipient user id.
    pub to: String,
    /// Message text.
    pub content: String,
}

/// Payload of `typing`, in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingPayload {
    /// Room the user is typing in.
    pub room: String,
    /// Typing user's id.
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Typing user's display name.
    pub name: String,
}

/// Payload of `joined`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedPayload {
    /// Room that was joined.
    pub room: String,
    /// Registered display name.
    pub name: String,
    /// Id the server assigned to this connection.
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Payload of `error` and `connect_error`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Free-text error message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Payload of `room:members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMembersPayload {
    /// Room the list belongs to.
    pub room: String,
    /// Everyone who has joined the room.
    #[serde(default)]
    pub members: Vec<RoomMember>,
}

/// Events emitted by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Join a room, registering the display name on first join.
    Join(JoinPayload),
    /// Leave a room. The argument is the bare room name.
    Leave(String),
    /// Post to a room.
    Chat(ChatPayload),
    /// Send a private message.
    Private(PrivatePayload),
    /// Announce that we are typing.
    Typing(TypingPayload),
}

impl ClientEvent {
    /// Wire name of this event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Join(_) => "join",
            Self::Leave(_) => "leave",
            Self::Chat(_) => "chat",
            Self::Private(_) => "private",
            Self::Typing(_) => "typing",
        }
    }

    /// Build a `join` event.
    pub fn join(room: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Join(JoinPayload { room: room.into(), name: name.into() })
    }

    /// Build a `chat` event.
    pub fn chat(room: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Chat(ChatPayload { room: room.into(), content: content.into() })
    }

    /// Build a `private` event.
    pub fn private(to: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Private(PrivatePayload { to: to.into(), content: content.into() })
    }

    /// Split into the event name and its argument.
    pub fn into_parts(self) -> Result<(&'static str, Value)> {
        let name = self.name();
        let data = match self {
            Self::Join(p) => serde_json::to_value(p),
            Self::Leave(room) => Ok(Value::String(room)),
            Self::Chat(p) => serde_json::to_value(p),
            Self::Private(p) => serde_json::to_value(p),
            Self::Typing(p) => serde_json::to_value(p),
        }?;
        Ok((name, data))
    }

    /// Decode a client event from its name and argument.
    pub fn from_parts(name: &str, data: Value) -> Result<Self> {
        match name {
            "join" => payload(name, data).map(Self::Join),
            "leave" => payload(name, data).map(Self::Leave),
            "chat" => payload(name, data).map(Self::Chat),
            "private" => payload(name, data).map(Self::Private),
            "typing" => payload(name, data).map(Self::Typing),
            _ => Err(ProtocolError::UnknownEvent(name.to_string())),
        }
    }
}

/// Events pushed by the server.
///
/// `Connect`, `Disconnect` and `ConnectError` describe the socket itself. The
/// transport synthesizes them from the connection lifecycle; they are accepted
/// on the wire too so that fakes can script them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Socket connected.
    Connect,
    /// Socket dropped.
    Disconnect,
    /// Socket could not connect.
    ConnectError(ErrorPayload),
    /// Join acknowledged.
    Joined(JoinedPayload),
    /// Full presence snapshot.
    Users(Vec<UserSummary>),
    /// Group message.
    Chat(ChatMessage),
    /// Private message (echoed to the sender as well).
    Private(ChatMessage),
    /// A room was created.
    GroupCreated(Group),
    /// Known rooms.
    Groups(Vec<Group>),
    /// Someone is typing.
    Typing(TypingPayload),
    /// Server-side failure.
    Error(ErrorPayload),
    /// Members of a room with online flags.
    RoomMembers(RoomMembersPayload),
    /// Rooms this connection is currently joined to.
    JoinedRooms(Vec<String>),
}

impl ServerEvent {
    /// Wire name of this event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::ConnectError(_) => "connect_error",
            Self::Joined(_) => "joined",
            Self::Users(_) => "users",
            Self::Chat(_) => "chat",
            Self::Private(_) => "private",
            Self::GroupCreated(_) => "group:created",
            Self::Groups(_) => "groups",
            Self::Typing(_) => "typing",
            Self::Error(_) => "error",
            Self::RoomMembers(_) => "room:members",
            Self::JoinedRooms(_) => "joined:rooms",
        }
    }

    /// Split into the event name and its argument.
    pub fn into_parts(self) -> Result<(&'static str, Value)> {
        let name = self.name();
        let data = match self {
            Self::Connect | Self::Disconnect => Ok(Value::Null),
            Self::ConnectError(p) | Self::Error(p) => serde_json::to_value(p),
            Self::Joined(p) => serde_json::to_value(p),
            Self::Users(p) => serde_json::to_value(p),
            Self::Chat(p) | Self::Private(p) => serde_json::to_value(p),
            Self::GroupCreated(p) => serde_json::to_value(p),
            Self::Groups(p) => serde_json::to_value(p),
            Self::Typing(p) => serde_json::to_value(p),
            Self::RoomMembers(p) => serde_json::to_value(p),
            Self::JoinedRooms(p) => serde_json::to_value(p),
        }?;
        Ok((name, data))
    }

    /// Decode a server event from its name and argument.
    ///
    /// A missing argument arrives as `null`; `groups` and `users` treat that
    /// as an empty list, which is what the server sends when nothing exists.
    pub fn from_parts(name: &str, data: Value) -> Result<Self> {
        let list = |data: Value| if data.is_null() { Value::Array(Vec::new()) } else { data };
        match name {
            "connect" => Ok(Self::Connect),
            "disconnect" => Ok(Self::Disconnect),
            "connect_error" => payload(name, data).map(Self::ConnectError),
            "joined" => payload(name, data).map(Self::Joined),
            "users" => payload(name, list(data)).map(Self::Users),
            "chat" => payload(name, data).map(Self::Chat),
            "private" => payload(name, data).map(Self::Private),
            "group:created" => payload(name, data).map(Self::GroupCreated),
            "groups" => payload(name, list(data)).map(Self::Groups),
            "typing" => payload(name, data).map(Self::Typing),
            "error" => payload(name, data).map(Self::Error),
            "room:members" => payload(name, data).map(Self::RoomMembers),
            "joined:rooms" => payload(name, list(data)).map(Self::JoinedRooms),
            _ => Err(ProtocolError::UnknownEvent(name.to_string())),
        }
    }
}
