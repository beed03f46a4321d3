//! Typed handlers for inbound channel events.
//!
//! [`EventSink`] has one method per [`ServerEvent`] kind, which makes the
//! mapping from wire event to state mutation explicit. [`dispatch`] is the
//! only place that matches on the event enum.

use parlor_proto::{
    ChatMessage, Group, ServerEvent, UserSummary,
    events::{ErrorPayload, JoinedPayload, RoomMembersPayload, TypingPayload},
};

use crate::AppAction;

/// Receiver of real-time channel events.
///
/// Each handler mutates the receiver and returns actions for the runtime.
pub trait EventSink {
    /// Channel opened.
    fn on_connect(&mut self) -> Vec<AppAction>;

    /// Channel dropped.
    fn on_disconnect(&mut self) -> Vec<AppAction>;

    /// Channel failed to open.
    fn on_connect_error(&mut self, error: ErrorPayload) -> Vec<AppAction>;

    /// Join acknowledged.
    fn on_joined(&mut self, joined: JoinedPayload) -> Vec<AppAction>;

    /// Presence snapshot.
    fn on_users(&mut self, users: Vec<UserSummary>) -> Vec<AppAction>;

    /// Group message.
    fn on_chat(&mut self, message: ChatMessage) -> Vec<AppAction>;

    /// Private message.
    fn on_private(&mut self, message: ChatMessage) -> Vec<AppAction>;

    /// Room created anywhere on the server.
    fn on_group_created(&mut self, group: Group) -> Vec<AppAction>;

    /// Known rooms.
    fn on_groups(&mut self, groups: Vec<Group>) -> Vec<AppAction>;

    /// Typing notice.
    fn on_typing(&mut self, typing: TypingPayload) -> Vec<AppAction>;

    /// Server-reported error.
    fn on_error(&mut self, error: ErrorPayload) -> Vec<AppAction>;

    /// Room member list.
    fn on_room_members(&mut self, members: RoomMembersPayload) -> Vec<AppAction>;

    /// Rooms joined on this connection.
    fn on_joined_rooms(&mut self, rooms: Vec<String>) -> Vec<AppAction>;
}

/// Route a server event to the matching sink handler.
pub fn dispatch<S: EventSink + ?Sized>(sink: &mut S, event: ServerEvent) -> Vec<AppAction> {
    match event {
        ServerEvent::Connect => sink.on_connect(),
        ServerEvent::Disconnect => sink.on_disconnect(),
        ServerEvent::ConnectError(error) => sink.on_connect_error(error),
        ServerEvent::Joined(joined) => sink.on_joined(joined),
        ServerEvent::Users(users) => sink.on_users(users),
        ServerEvent::Chat(message) => sink.on_chat(message),
        ServerEvent::Private(message) => sink.on_private(message),
        ServerEvent::GroupCreated(group) => sink.on_group_created(group),
        ServerEvent::Groups(groups) => sink.on_groups(groups),
        ServerEvent::Typing(typing) => sink.on_typing(typing),
        ServerEvent::Error(error) => sink.on_error(error),
        ServerEvent::RoomMembers(members) => sink.on_room_members(members),
        ServerEvent::JoinedRooms(rooms) => sink.on_joined_rooms(rooms),
    }
}
