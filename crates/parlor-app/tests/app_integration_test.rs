//! Integration tests for App reconciliation behavior.
//!
//! # Oracle Pattern
//!
//! Tests drive the App only through its public surface (server events, REST
//! responses, ticks and user commands) and end with oracle checks that verify:
//! - Buffers hold each message once, in arrival order
//! - Messages land in the right room or private thread
//! - Unread counts, typing indicators and join state match what was observed

use std::time::{Duration, Instant};

use parlor_app::{
    ApiRequest, ApiResponse, App, AppAction, AppConfig, AppEvent, ConnectionState, Focus,
    JOIN_TIMEOUT_MESSAGE, Preferences,
};
use parlor_proto::{
    ChatMessage, ClientEvent, Group, RoomMember, ServerEvent, UserSummary,
    events::{ErrorPayload, JoinedPayload, RoomMembersPayload, TypingPayload},
};

fn room_message(id: u64, room: &str, author_id: &str) -> ChatMessage {
    ChatMessage {
        id,
        room: room.into(),
        author: format!("user-{author_id}"),
        author_id: author_id.into(),
        recipient: None,
        recipient_id: None,
        content: format!("message {id}"),
        is_private: false,
        created_at: "2024-01-01T00:00:00Z".into(),
    }
}

fn private_message(id: u64, from: (&str, &str), to: (&str, &str)) -> ChatMessage {
    ChatMessage {
        id,
        room: String::new(),
        author: from.1.into(),
        author_id: from.0.into(),
        recipient: Some(to.1.into()),
        recipient_id: Some(to.0.into()),
        content: format!("dm {id}"),
        is_private: true,
        created_at: String::new(),
    }
}

fn joined(room: &str, name: &str, user_id: &str) -> AppEvent {
    let payload = JoinedPayload { room: room.into(), name: name.into(), user_id: user_id.into() };
    ServerEvent::Joined(payload).into()
}

fn group(id: u64, name: &str) -> Group {
    Group { id, name: name.into(), created_at: String::new() }
}

fn history_requests(actions: &[AppAction]) -> Vec<ApiRequest> {
    actions
        .iter()
        .filter_map(|a| match a {
            AppAction::Request(
                r @ (ApiRequest::RoomHistory { .. } | ApiRequest::PrivateHistory { .. }),
            ) => Some(r.clone()),
            _ => None,
        })
        .collect()
}

fn emitted(actions: &[AppAction]) -> Vec<ClientEvent> {
    actions
        .iter()
        .filter_map(|a| match a {
            AppAction::Emit(event) => Some(event.clone()),
            _ => None,
        })
        .collect()
}

fn ids(messages: &[ChatMessage]) -> Vec<u64> {
    messages.iter().map(|m| m.id).collect()
}

/// App with the channel open and `general` acknowledged for Jane (`u1`).
fn joined_app() -> App {
    let mut app = App::new(AppConfig::default(), Preferences::default());
    app.join("Jane");
    app.handle(ServerEvent::Connect.into());
    app.handle(joined("general", "Jane", "u1"));
    app
}

#[test]
fn join_flow_delivers_live_message_once() {
    let mut app = App::new(AppConfig::default(), Preferences::default());

    let actions = app.join("Jane");
    assert!(actions.contains(&AppAction::Connect));

    let actions = app.handle(ServerEvent::Connect.into());
    assert_eq!(emitted(&actions), vec![ClientEvent::join("general", "Jane")]);

    let actions = app.handle(joined("general", "Jane", "u1"));
    let requests = history_requests(&actions);
    assert_eq!(requests.len(), 1);
    let ApiRequest::RoomHistory { room, generation } = &requests[0] else {
        panic!("expected room history request, got {requests:?}");
    };
    assert_eq!(room, "general");

    app.handle(
        ApiResponse::History {
            target: Focus::Room("general".into()),
            generation: *generation,
            result: Ok(vec![]),
        }
        .into(),
    );
    app.handle(ServerEvent::Chat(room_message(5, "general", "u2")).into());
    app.handle(ServerEvent::Chat(room_message(5, "general", "u2")).into());

    // Oracle: identity, join state, exactly one copy of message 5
    assert_eq!(app.identity(), Some(&UserSummary::new("u1", "Jane")));
    assert!(app.is_joined("general"));
    assert_eq!(ids(app.focused_messages()), vec![5]);
    assert_eq!(app.room_unread("general"), 0);
}

#[test]
fn live_message_survives_late_history() {
    let mut app = joined_app();
    let generation = app.generation();

    app.handle(ServerEvent::Chat(room_message(5, "general", "u2")).into());
    app.handle(
        ApiResponse::History {
            target: Focus::Room("general".into()),
            generation,
            result: Ok(vec![room_message(3, "general", "u2"), room_message(4, "general", "u3")]),
        }
        .into(),
    );

    assert_eq!(ids(app.focused_messages()), vec![3, 4, 5]);
}

#[test]
fn stale_history_is_discarded() {
    let mut app = joined_app();
    app.handle(ServerEvent::JoinedRooms(vec!["general".into(), "dev".into()]).into());

    let to_dev = app.focus_room("dev");
    let dev_generation = match history_requests(&to_dev).as_slice() {
        [ApiRequest::RoomHistory { generation, .. }] => *generation,
        other => panic!("unexpected requests: {other:?}"),
    };
    app.focus_room("general");
    assert!(app.generation() > dev_generation);

    // dev's slow response lands after we already moved on.
    let actions = app.handle(
        ApiResponse::History {
            target: Focus::Room("dev".into()),
            generation: dev_generation,
            result: Ok(vec![room_message(40, "dev", "u2")]),
        }
        .into(),
    );

    assert!(actions.is_empty());
    assert!(app.room("dev").is_none_or(|r| r.messages.is_empty()));
    assert!(app.is_loading());
}

#[test]
fn abandoned_history_stops_recording_live_messages() {
    let mut app = joined_app();
    app.handle(ServerEvent::JoinedRooms(vec!["general".into(), "dev".into()]).into());

    let to_dev = app.focus_room("dev");
    let dev_generation = match history_requests(&to_dev).as_slice() {
        [ApiRequest::RoomHistory { generation, .. }] => *generation,
        other => panic!("unexpected requests: {other:?}"),
    };
    app.focus_room("general");
    app.handle(
        ApiResponse::History {
            target: Focus::Room("dev".into()),
            generation: dev_generation,
            result: Ok(vec![]),
        }
        .into(),
    );

    for id in 100..600 {
        app.handle(ServerEvent::Chat(room_message(id, "dev", "u2")).into());
    }

    // Oracle: dev keeps its live messages and is no longer recording them
    let dev = app.room("dev").expect("dev state");
    assert!(!dev.messages.is_reloading());
    assert_eq!(dev.messages.len(), 500);
    assert_eq!(app.room_unread("dev"), 500);
}

#[test]
fn failed_history_stops_recording_live_messages() {
    let mut app = joined_app();
    let generation = app.generation();
    assert!(app.room("general").expect("general state").messages.is_reloading());

    app.handle(
        ApiResponse::History {
            target: Focus::Room("general".into()),
            generation,
            result: Err("boom".into()),
        }
        .into(),
    );
    app.handle(ServerEvent::Chat(room_message(7, "general", "u2")).into());

    let general = app.room("general").expect("general state");
    assert!(!general.messages.is_reloading());
    assert_eq!(ids(general.messages.messages()), vec![7]);
}

#[test]
fn stale_history_for_refocused_room_keeps_recording() {
    let mut app = joined_app();
    app.handle(ServerEvent::JoinedRooms(vec!["general".into(), "dev".into()]).into());

    let first = app.generation();
    app.focus_room("dev");
    app.focus_room("general");
    assert!(app.generation() > first);

    // The first general fetch is outdated, but a newer one is in flight.
    app.handle(
        ApiResponse::History { target: Focus::Room("general".into()), generation: first, result: Ok(vec![]) }
            .into(),
    );
    app.handle(ServerEvent::Chat(room_message(9, "general", "u2")).into());
    app.handle(
        ApiResponse::History {
            target: Focus::Room("general".into()),
            generation: app.generation(),
            result: Ok(vec![room_message(8, "general", "u3")]),
        }
        .into(),
    );

    assert_eq!(ids(app.focused_messages()), vec![8, 9]);
}

#[test]
fn history_failure_sets_status() {
    let mut app = joined_app();
    let generation = app.generation();

    app.handle(
        ApiResponse::History {
            target: Focus::Room("general".into()),
            generation,
            result: Err("boom".into()),
        }
        .into(),
    );

    assert_eq!(app.status(), "Unable to load messages");
    assert!(!app.is_loading());
}

#[test]
fn reconnect_replays_every_joined_room() {
    let mut app = joined_app();
    app.handle(ServerEvent::JoinedRooms(vec!["general".into(), "dev".into()]).into());

    let t0 = Instant::now();
    app.handle(AppEvent::Tick { now: t0 });
    app.handle(ServerEvent::Disconnect.into());
    assert_eq!(app.connection_state(), ConnectionState::Disconnected);
    assert!(!app.is_joined("general"));

    let early = app.handle(AppEvent::Tick { now: t0 + Duration::from_secs(1) });
    assert!(!early.contains(&AppAction::Connect));

    let due = app.handle(AppEvent::Tick { now: t0 + Duration::from_secs(2) });
    assert!(due.contains(&AppAction::Connect));
    assert_eq!(app.connection_state(), ConnectionState::Connecting);

    let actions = app.handle(ServerEvent::Connect.into());
    let mut joins = emitted(&actions);
    joins.sort_by_key(|e| format!("{e:?}"));
    assert_eq!(joins, vec![ClientEvent::join("dev", "Jane"), ClientEvent::join("general", "Jane")]);

    // The server hands out a new id on the new connection; the name stays.
    app.handle(joined("general", "Jane", "u7"));
    assert_eq!(app.identity(), Some(&UserSummary::new("u7", "Jane")));
}

#[test]
fn no_reconnect_without_join_request() {
    let mut app = App::new(AppConfig::default(), Preferences::default());
    app.handle(ServerEvent::Connect.into());
    app.handle(ServerEvent::Disconnect.into());

    let actions = app.handle(AppEvent::Tick { now: Instant::now() + Duration::from_secs(60) });
    assert!(!actions.contains(&AppAction::Connect));
}

#[test]
fn unread_counts_only_unfocused_rooms() {
    let mut app = joined_app();
    app.handle(ServerEvent::JoinedRooms(vec!["general".into(), "dev".into()]).into());

    app.handle(ServerEvent::Chat(room_message(1, "dev", "u2")).into());
    app.handle(ServerEvent::Chat(room_message(2, "dev", "u3")).into());
    app.handle(ServerEvent::Chat(room_message(3, "general", "u2")).into());
    // Our own post echoed back does not count.
    app.handle(ServerEvent::Chat(room_message(4, "dev", "u1")).into());

    assert_eq!(app.room_unread("dev"), 2);
    assert_eq!(app.room_unread("general"), 0);

    app.focus_room("dev");
    assert_eq!(app.room_unread("dev"), 0);
}

#[test]
fn messages_for_unjoined_rooms_are_dropped() {
    let mut app = joined_app();
    let actions = app.handle(ServerEvent::Chat(room_message(9, "random", "u2")).into());

    assert!(actions.is_empty());
    assert!(app.room("random").is_none());
}

#[test]
fn private_messages_route_by_peer() {
    let mut app = joined_app();
    app.handle(
        ServerEvent::Users(vec![
            UserSummary::new("u1", "Jane"),
            UserSummary::new("u2", "Bob"),
            UserSummary::new("u3", "Cy"),
        ])
        .into(),
    );

    app.handle(ServerEvent::Private(private_message(10, ("u2", "Bob"), ("u1", "Jane"))).into());
    app.handle(ServerEvent::Private(private_message(11, ("u1", "Jane"), ("u3", "Cy"))).into());
    // Someone else's conversation.
    app.handle(ServerEvent::Private(private_message(12, ("u2", "Bob"), ("u3", "Cy"))).into());

    assert_eq!(app.peer_unread("u2"), 1);
    // Our own echo is stored but not unread.
    assert_eq!(app.peer_unread("u3"), 0);
    assert_eq!(app.thread("u3").map(|t| ids(t.messages.messages())), Some(vec![11]));
    assert_eq!(app.thread("u2").map(|t| ids(t.messages.messages())), Some(vec![10]));
    assert_eq!(app.peer_name("u3"), "Cy");

    let actions = app.focus_peer("u2");
    assert_eq!(app.peer_unread("u2"), 0);
    assert_eq!(history_requests(&actions), vec![ApiRequest::PrivateHistory {
        peer: "u2".into(),
        me: "u1".into(),
        generation: app.generation(),
    }]);

    let actions = app.send_message("hi Bob");
    assert_eq!(emitted(&actions), vec![ClientEvent::private("u2", "hi Bob")]);

    let others: Vec<_> = app.other_users().iter().map(|u| u.id.as_str()).collect();
    assert_eq!(others, vec!["u2", "u3"]);
}

#[test]
fn typing_indicator_expires_after_three_seconds() {
    let mut app = joined_app();
    let t0 = Instant::now();
    app.handle(AppEvent::Tick { now: t0 });

    app.handle(
        ServerEvent::Typing(TypingPayload {
            room: "general".into(),
            user_id: "u2".into(),
            name: "Bob".into(),
        })
        .into(),
    );
    assert_eq!(app.typing_in("general"), vec!["Bob"]);

    app.handle(AppEvent::Tick { now: t0 + Duration::from_millis(2999) });
    assert_eq!(app.typing_in("general"), vec!["Bob"]);

    app.handle(AppEvent::Tick { now: t0 + Duration::from_millis(3000) });
    assert!(app.typing_in("general").is_empty());
}

#[test]
fn message_clears_author_typing() {
    let mut app = joined_app();
    app.handle(
        ServerEvent::Typing(TypingPayload {
            room: "general".into(),
            user_id: "u2".into(),
            name: "Bob".into(),
        })
        .into(),
    );
    app.handle(ServerEvent::Chat(room_message(1, "general", "u2")).into());

    assert!(app.typing_in("general").is_empty());
}

#[test]
fn groups_stay_sorted_and_unique() {
    let mut app = App::new(AppConfig::default(), Preferences::default());
    app.handle(ApiResponse::Groups(Ok(vec![group(1, "zeta"), group(2, "alpha")])).into());
    app.handle(ServerEvent::GroupCreated(group(3, "Beta")).into());
    let again = app.handle(ServerEvent::GroupCreated(group(3, "Beta")).into());

    assert!(again.is_empty());
    let names: Vec<_> = app.groups().iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Beta", "alpha", "zeta"]);
    assert_eq!(app.room_names(), vec!["Beta", "alpha", "general", "zeta"]);
}

#[test]
fn create_group_failure_shows_server_text() {
    let mut app = App::new(AppConfig::default(), Preferences::default());
    let actions = app.create_group(" dev ");
    assert!(actions.contains(&AppAction::Request(ApiRequest::CreateGroup { name: "dev".into() })));

    app.handle(ApiResponse::GroupCreated(Err("group already exists".into())).into());
    assert_eq!(app.status(), "group already exists");
}

#[test]
fn join_timeout_is_reported() {
    let mut app = App::new(AppConfig::default(), Preferences::default());
    let t0 = Instant::now();
    app.handle(AppEvent::Tick { now: t0 });
    app.join("Jane");

    app.handle(AppEvent::Tick { now: t0 + Duration::from_secs(10) });

    assert_eq!(app.join_error(), Some(JOIN_TIMEOUT_MESSAGE));
    assert!(!app.is_join_pending());
}

#[test]
fn connect_error_fails_pending_join() {
    let mut app = App::new(AppConfig::default(), Preferences::default());
    app.join("Jane");
    app.handle(
        ServerEvent::ConnectError(ErrorPayload { message: Some("connection refused".into()) })
            .into(),
    );

    assert_eq!(app.connection_state(), ConnectionState::Disconnected);
    assert_eq!(app.join_error(), Some("connection refused"));
}

#[test]
fn connect_error_is_not_overwritten_by_join_timeout() {
    let mut app = App::new(AppConfig::default(), Preferences::default());
    let t0 = Instant::now();
    app.handle(AppEvent::Tick { now: t0 });
    app.join("Jane");
    app.handle(
        ServerEvent::ConnectError(ErrorPayload { message: Some("connection refused".into()) })
            .into(),
    );
    assert!(!app.is_join_pending());

    app.handle(AppEvent::Tick { now: t0 + Duration::from_secs(11) });

    assert_eq!(app.join_error(), Some("connection refused"));
}

#[test]
fn room_members_are_stored_per_room() {
    let mut app = joined_app();
    app.handle(
        ServerEvent::RoomMembers(RoomMembersPayload {
            room: "general".into(),
            members: vec![RoomMember { id: "u2".into(), name: "Bob".into(), is_online: true }],
        })
        .into(),
    );

    assert_eq!(app.room("general").map(|r| r.members.len()), Some(1));
}

#[test]
fn focusing_unjoined_room_sends_join() {
    let mut app = joined_app();
    let actions = app.focus_room("dev");

    assert_eq!(emitted(&actions), vec![ClientEvent::join("dev", "Jane")]);

    // Posting waits for the ack.
    let actions = app.send_message("hello");
    assert!(emitted(&actions).is_empty());
    assert_eq!(app.status(), "Join a room first");

    app.handle(joined("dev", "Jane", "u1"));
    let actions = app.send_message("hello");
    assert_eq!(emitted(&actions), vec![ClientEvent::chat("dev", "hello")]);
}

#[test]
fn saved_preferences_restore_session_rooms() {
    let prefs = Preferences { display_name: Some("Jane".into()), ..Preferences::default() };
    let mut app = App::new(AppConfig::default(), prefs);
    app.join("Jane");

    let actions = app.handle(ServerEvent::Connect.into());
    assert_eq!(emitted(&actions), vec![ClientEvent::join("general", "Jane")]);
    // Name unchanged, nothing to persist.
    assert!(!actions.iter().any(|a| matches!(a, AppAction::Persist(_))));
}

#[test]
fn configured_default_room_is_the_only_implicit_room() {
    let config = AppConfig { default_room: "dev".into(), ..AppConfig::default() };
    let mut app = App::new(config, Preferences::default());

    assert_eq!(app.room_names(), vec!["dev"]);
    assert!(!app.preferences().joined_rooms.contains("general"));

    app.join("Jane");
    let actions = app.handle(ServerEvent::Connect.into());
    assert_eq!(emitted(&actions), vec![ClientEvent::join("dev", "Jane")]);
}
