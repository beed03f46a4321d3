//! Typing indicator expiry.
//!
//! Each (room, user) pair owns a single deadline. A fresh notice moves that
//! deadline forward instead of stacking a second timer, so an indicator never
//! clears early because an older notice ran out.
//!
//! Time is passed in, never read, so the tracker works with real and virtual
//! clocks alike.

use std::{
    collections::{BTreeMap, HashMap},
    ops::Sub,
    time::{Duration, Instant},
};

#[derive(Debug, Clone)]
struct Entry<I> {
    name: String,
    last_seen: I,
}

/// Tracks who is typing in which room.
///
/// Generic over `I` (instant type) to support both production and simulated
/// time.
#[derive(Debug, Clone)]
pub struct TypingTracker<I = Instant>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    ttl: Duration,
    /// room -> user id -> entry. `BTreeMap` keeps the display order stable.
    rooms: HashMap<String, BTreeMap<String, Entry<I>>>,
}

impl<I> TypingTracker<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Create a tracker whose entries expire `ttl` after their last notice.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, rooms: HashMap::new() }
    }

    /// Record a typing notice, resetting that user's deadline in `room`.
    ///
    /// Returns `true` if the user was not already shown as typing.
    pub fn notice(&mut self, room: &str, user_id: &str, name: &str, now: I) -> bool {
        let users = self.rooms.entry(room.to_string()).or_default();
        match users.get_mut(user_id) {
            Some(entry) => {
                entry.last_seen = entry.last_seen.max(now);
                entry.name = name.to_string();
                false
            },
            None => {
                users.insert(user_id.to_string(), Entry { name: name.to_string(), last_seen: now });
                true
            },
        }
    }

    /// Drop a user's entry immediately (e.g. they sent the message).
    pub fn clear(&mut self, room: &str, user_id: &str) -> bool {
        self.rooms.get_mut(room).is_some_and(|users| users.remove(user_id).is_some())
    }

    /// Remove every entry whose deadline has passed.
    ///
    /// Returns `true` if anything was removed.
    pub fn expire(&mut self, now: I) -> bool {
        let ttl = self.ttl;
        let mut changed = false;

        for users in self.rooms.values_mut() {
            let before = users.len();
            users.retain(|_, entry| now < entry.last_seen || now - entry.last_seen < ttl);
            changed |= users.len() != before;
        }
        self.rooms.retain(|_, users| !users.is_empty());

        changed
    }

    /// Display names currently typing in `room`, ordered by user id.
    pub fn typing_in(&self, room: &str) -> Vec<&str> {
        self.rooms
            .get(room)
            .map(|users| users.values().map(|e| e.name.as_str()).collect())
            .unwrap_or_default()
    }
}
