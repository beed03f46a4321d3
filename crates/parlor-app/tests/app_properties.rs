//! Property-based tests for App state machine.
//!
//! Tests verify that reconciliation invariants hold under arbitrary orderings
//! of server pushes, REST responses and focus changes.

use std::{
    collections::HashSet,
    time::{Duration, Instant},
};

use parlor_app::{ApiResponse, App, AppConfig, AppEvent, Focus, Preferences};
use parlor_proto::{
    ChatMessage, Group, ServerEvent,
    events::{JoinedPayload, TypingPayload},
};
use proptest::prelude::*;

fn room_message(id: u64, room: &str, author_id: &str) -> ChatMessage {
    ChatMessage {
        id,
        room: room.into(),
        author: author_id.to_uppercase(),
        author_id: author_id.into(),
        recipient: None,
        recipient_id: None,
        content: format!("message {id}"),
        is_private: false,
        created_at: String::new(),
    }
}

/// App joined to `general` and `dev` as `u1`, focused on `general`.
fn joined_app() -> App {
    let mut app = App::new(AppConfig::default(), Preferences::default());
    app.join("Jane");
    app.handle(ServerEvent::Connect.into());
    app.handle(
        ServerEvent::Joined(JoinedPayload {
            room: "general".into(),
            name: "Jane".into(),
            user_id: "u1".into(),
        })
        .into(),
    );
    app.handle(ServerEvent::JoinedRooms(vec!["general".into(), "dev".into()]).into());
    app
}

/// Inputs that race each other in a real session.
#[derive(Debug, Clone)]
enum Input {
    Chat { id: u64, dev: bool },
    Focus { dev: bool },
    History { dev: bool, generation: u64, ids: Vec<u64> },
}

fn input_strategy() -> impl Strategy<Value = Input> {
    prop_oneof![
        4 => (0u64..20, any::<bool>()).prop_map(|(id, dev)| Input::Chat { id, dev }),
        1 => any::<bool>().prop_map(|dev| Input::Focus { dev }),
        2 => (any::<bool>(), 0u64..6, prop::collection::vec(0u64..20, 0..5))
            .prop_map(|(dev, generation, ids)| Input::History { dev, generation, ids }),
    ]
}

fn room_of(dev: bool) -> &'static str {
    if dev { "dev" } else { "general" }
}

proptest! {
    #[test]
    fn prop_buffers_never_hold_duplicates(inputs in prop::collection::vec(input_strategy(), 0..60)) {
        let mut app = joined_app();

        for input in inputs {
            match input {
                Input::Chat { id, dev } => {
                    app.handle(ServerEvent::Chat(room_message(id, room_of(dev), "u2")).into());
                },
                Input::Focus { dev } => {
                    app.focus_room(room_of(dev));
                },
                Input::History { dev, generation, ids } => {
                    let room = room_of(dev);
                    let messages = ids.into_iter().map(|id| room_message(id, room, "u3")).collect();
                    app.handle(
                        ApiResponse::History {
                            target: Focus::Room(room.into()),
                            generation,
                            result: Ok(messages),
                        }
                        .into(),
                    );
                },
            }

            for room in ["general", "dev"] {
                if let Some(state) = app.room(room) {
                    let mut seen = HashSet::new();
                    for message in state.messages.messages() {
                        prop_assert!(seen.insert(message.id), "duplicate id {} in {}", message.id, room);
                        prop_assert_eq!(&message.room, room);
                    }
                }
            }
        }
    }

    #[test]
    fn prop_redelivery_is_idempotent(ids in prop::collection::vec(0u64..30, 1..40)) {
        let mut app = joined_app();
        for id in &ids {
            app.handle(ServerEvent::Chat(room_message(*id, "general", "u2")).into());
        }
        let once: Vec<u64> = app.focused_messages().iter().map(|m| m.id).collect();

        for id in &ids {
            app.handle(ServerEvent::Chat(room_message(*id, "general", "u2")).into());
        }
        let twice: Vec<u64> = app.focused_messages().iter().map(|m| m.id).collect();

        // First-arrival order, each id once.
        let mut expected = Vec::new();
        for id in ids {
            if !expected.contains(&id) {
                expected.push(id);
            }
        }
        prop_assert_eq!(&once, &expected);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_unread_counts_distinct_unfocused_messages(ids in prop::collection::hash_set(0u64..1000, 0..50)) {
        let mut app = joined_app();
        for id in &ids {
            app.handle(ServerEvent::Chat(room_message(*id, "dev", "u2")).into());
            // Redelivery must not inflate the badge.
            app.handle(ServerEvent::Chat(room_message(*id, "dev", "u2")).into());
        }

        prop_assert_eq!(app.room_unread("dev") as usize, ids.len());
        prop_assert_eq!(app.room_unread("general"), 0);
    }

    #[test]
    fn prop_groups_sorted_and_unique(
        groups in prop::collection::vec((0u64..20, "[A-Za-z]{1,8}"), 0..30),
    ) {
        let mut app = App::new(AppConfig::default(), Preferences::default());
        for (id, name) in groups {
            app.handle(ServerEvent::GroupCreated(Group { id, name, created_at: String::new() }).into());
        }

        let names: Vec<&str> = app.groups().iter().map(|g| g.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        prop_assert_eq!(names, sorted);

        let mut ids = HashSet::new();
        for group in app.groups() {
            prop_assert!(ids.insert(group.id));
        }
    }

    #[test]
    fn prop_typing_visible_until_ttl(offsets in prop::collection::vec(0u64..6000, 1..10), check in 0u64..12000) {
        let mut app = joined_app();
        let t0 = Instant::now();
        app.handle(AppEvent::Tick { now: t0 });

        let mut offsets = offsets;
        offsets.sort_unstable();
        for offset in &offsets {
            app.handle(AppEvent::Tick { now: t0 + Duration::from_millis(*offset) });
            app.handle(
                ServerEvent::Typing(TypingPayload {
                    room: "general".into(),
                    user_id: "u2".into(),
                    name: "Bob".into(),
                })
                .into(),
            );
        }

        let last = offsets.last().copied().unwrap_or_default();
        let check = last.max(check);
        app.handle(AppEvent::Tick { now: t0 + Duration::from_millis(check) });

        let visible = !app.typing_in("general").is_empty();
        prop_assert_eq!(visible, check - last < 3000);
    }
}
