//! Observable application state types.
//!
//! This module defines the data structures that represent the client's
//! current view of the chat session, such as [`RoomState`], [`ThreadState`]
//! and [`ConnectionState`].
//!
//! These structures are the "View Model": the subset of server state needed to
//! render the UI. Buffers are append-only apart from a history load, which
//! replaces them wholesale.

use std::collections::HashSet;

use parlor_proto::{ChatMessage, MessageId, RoomMember, UserId};

/// Connection state of the real-time channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected to the server.
    Disconnected,
    /// Connection in progress.
    Connecting,
    /// Channel is open. Joins are tracked separately per room.
    Connected,
}

/// What the UI is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Focus {
    /// A group room, by name.
    Room(String),
    /// A private thread, by peer user id.
    Peer(UserId),
}

impl Focus {
    /// Room name if this is a group focus.
    pub fn room(&self) -> Option<&str> {
        match self {
            Self::Room(name) => Some(name),
            Self::Peer(_) => None,
        }
    }

    /// Peer id if this is a private focus.
    pub fn peer(&self) -> Option<&str> {
        match self {
            Self::Peer(id) => Some(id),
            Self::Room(_) => None,
        }
    }
}

/// Arrival-ordered message list that rejects duplicate ids.
///
/// While a history reload is outstanding, live pushes are also recorded so
/// that [`MessageBuffer::replace`] can put them back after the fetched
/// history if the server snapshot predates them.
#[derive(Debug, Clone, Default)]
pub struct MessageBuffer {
    messages: Vec<ChatMessage>,
    ids: HashSet<MessageId>,
    /// Live messages received since `begin_reload`. `None` if no reload.
    reloading: Option<Vec<ChatMessage>>,
}

impl MessageBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message unless its id is already present.
    ///
    /// Returns `true` if the message was inserted.
    pub fn push(&mut self, message: ChatMessage) -> bool {
        if !self.ids.insert(message.id) {
            return false;
        }
        if let Some(live) = &mut self.reloading {
            live.push(message.clone());
        }
        self.messages.push(message);
        true
    }

    /// Start recording live pushes until the next [`MessageBuffer::replace`].
    pub fn begin_reload(&mut self) {
        self.reloading.get_or_insert_with(Vec::new);
    }

    /// Stop recording without touching the messages.
    ///
    /// Used when the fetch that `begin_reload` was waiting for failed or was
    /// superseded.
    pub fn cancel_reload(&mut self) {
        self.reloading = None;
    }

    /// Whether live pushes are being recorded for a pending reload.
    pub fn is_reloading(&self) -> bool {
        self.reloading.is_some()
    }

    /// Replace the whole buffer with a fetched history.
    ///
    /// Duplicate ids inside `history` keep their first occurrence. Messages
    /// pushed since `begin_reload` that the history does not contain are
    /// appended after it.
    pub fn replace(&mut self, history: Vec<ChatMessage>) {
        let live = self.reloading.take().unwrap_or_default();
        self.messages.clear();
        self.ids.clear();
        for message in history.into_iter().chain(live) {
            self.push(message);
        }
    }

    /// Whether a message with this id is present.
    pub fn contains(&self, id: MessageId) -> bool {
        self.ids.contains(&id)
    }

    /// Messages in arrival order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Per-room state.
#[derive(Debug, Clone, Default)]
pub struct RoomState {
    /// Messages in this room.
    pub messages: MessageBuffer,
    /// Last member list pushed for this room.
    pub members: Vec<RoomMember>,
    /// Messages received while the room was not focused.
    pub unread: u32,
}

/// Per-peer private thread state.
#[derive(Debug, Clone, Default)]
pub struct ThreadState {
    /// Last known display name of the peer.
    pub peer_name: String,
    /// Messages exchanged with the peer.
    pub messages: MessageBuffer,
    /// Messages received while the thread was not focused.
    pub unread: u32,
}
