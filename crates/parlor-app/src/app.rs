//! Application state machine.
//!
//! This module defines the [`App`] state machine, which merges three
//! independent, unordered streams into one consistent view: pushes over the
//! real-time channel, REST responses, and the user's own commands.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Tracks the room list, per-room and per-peer buffers, and unread counts.
//! - Remembers the session identity and replays joins after a reconnect.
//! - Discards history responses that belong to an abandoned focus.
//! - Expires typing indicators and reports unacknowledged joins.
//!
//! # Invariants
//!
//! - A message id appears at most once per buffer.
//! - A buffer is only replaced by a history response whose generation matches
//!   the current focus generation.
//! - Nothing is sent on the channel unless it is connected.

use std::{
    collections::{BTreeSet, HashMap},
    time::Instant,
};

use parlor_proto::{
    ChatMessage, ClientEvent, Group, RoomMember, UserId, UserSummary,
    events::{ErrorPayload, JoinedPayload, RoomMembersPayload, TypingPayload},
};
use tracing::{debug, info, warn};

use crate::{
    ApiRequest, ApiResponse, AppAction, AppConfig, AppEvent, ConnectionState, EventSink, Focus,
    Preferences, RoomState, Theme, ThreadState, TypingTracker, dispatch,
};

/// Status shown when the server never acknowledges a join.
pub const JOIN_TIMEOUT_MESSAGE: &str = "Timed out waiting for the server to accept the join";

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies, time included: the clock only moves on
/// [`AppEvent::Tick`].
#[derive(Debug, Clone)]
pub struct App {
    config: AppConfig,
    /// Connection state of the real-time channel.
    state: ConnectionState,
    /// Latest instant seen. Never moves backwards.
    clock: Instant,
    prefs: Preferences,
    /// Identity assigned by the server. `None` until the first join ack.
    identity: Option<UserSummary>,
    /// Whether `identity` was confirmed on the current connection.
    identity_acked: bool,
    /// Set once the user asked to join. Gates join replay and reconnects.
    session_requested: bool,
    /// When the outstanding join was sent. `None` if nothing is pending.
    pending_join: Option<Instant>,
    /// Failure of the last join attempt, for the join form.
    join_error: Option<String>,
    /// Rooms acknowledged on the current connection.
    session_joined: BTreeSet<String>,
    /// Known rooms, sorted by name, unique by id.
    groups: Vec<Group>,
    rooms: HashMap<String, RoomState>,
    threads: HashMap<UserId, ThreadState>,
    /// Last presence snapshot, in server order.
    presence: Vec<UserSummary>,
    typing: TypingTracker,
    focus: Focus,
    /// Bumped on every focus change. History responses carry it back.
    generation: u64,
    loading: bool,
    ever_connected: bool,
    last_connect_attempt: Option<Instant>,
    last_typing_sent: Option<Instant>,
    status: String,
}

impl App {
    /// Create an App from configuration and previously saved preferences.
    pub fn new(config: AppConfig, prefs: Preferences) -> Self {
        let prefs = prefs.normalized(&config.default_room);
        let focus = Focus::Room(config.default_room.clone());
        let mut rooms = HashMap::new();
        rooms.insert(config.default_room.clone(), RoomState::default());

        Self {
            typing: TypingTracker::new(config.typing_ttl),
            config,
            state: ConnectionState::Disconnected,
            clock: Instant::now(),
            prefs,
            identity: None,
            identity_acked: false,
            session_requested: false,
            pending_join: None,
            join_error: None,
            session_joined: BTreeSet::new(),
            groups: Vec::new(),
            rooms,
            threads: HashMap::new(),
            presence: Vec::new(),
            focus,
            generation: 0,
            loading: false,
            ever_connected: false,
            last_connect_attempt: None,
            last_typing_sent: None,
            status: "Not connected".to_string(),
        }
    }

    /// Initial loads: the room list and the default room's history.
    pub fn start(&mut self) -> Vec<AppAction> {
        let mut actions = vec![AppAction::Request(ApiRequest::Groups)];
        actions.extend(self.history_request());
        actions.push(AppAction::Render);
        actions
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick { now } => self.tick(now),
            AppEvent::Server(event) => dispatch(self, event),
            AppEvent::Response(response) => self.handle_response(response),
        }
    }

    fn tick(&mut self, now: Instant) -> Vec<AppAction> {
        self.clock = self.clock.max(now);
        let now = self.clock;
        let mut actions = Vec::new();
        let mut dirty = self.typing.expire(now);

        if let Some(since) = self.pending_join
            && now - since >= self.config.join_timeout
        {
            warn!("join not acknowledged after {:?}", self.config.join_timeout);
            self.pending_join = None;
            self.join_error = Some(JOIN_TIMEOUT_MESSAGE.to_string());
            self.status = JOIN_TIMEOUT_MESSAGE.to_string();
            dirty = true;
        }

        if self.should_reconnect(now) {
            info!("reconnecting");
            self.state = ConnectionState::Connecting;
            self.last_connect_attempt = Some(now);
            self.status = "Reconnecting...".to_string();
            actions.push(AppAction::Connect);
            dirty = true;
        }

        if dirty {
            actions.push(AppAction::Render);
        }
        actions
    }

    fn should_reconnect(&self, now: Instant) -> bool {
        self.state == ConnectionState::Disconnected
            && self.ever_connected
            && self.session_requested
            && self.prefs.display_name.is_some()
            && self
                .last_connect_attempt
                .is_none_or(|at| now - at >= self.config.reconnect_delay)
    }

    fn handle_response(&mut self, response: ApiResponse) -> Vec<AppAction> {
        match response {
            ApiResponse::Groups(Ok(groups)) => {
                let changed = self.merge_groups(groups);
                if changed { vec![AppAction::Render] } else { vec![] }
            },
            ApiResponse::Groups(Err(error)) => {
                warn!(%error, "loading groups failed");
                self.status = "Unable to load groups".to_string();
                vec![AppAction::Render]
            },
            ApiResponse::GroupCreated(Ok(group)) => {
                self.status = format!("Created #{}", group.name);
                self.merge_groups([group]);
                vec![AppAction::Render]
            },
            ApiResponse::GroupCreated(Err(error)) => {
                warn!(%error, "creating group failed");
                self.status = error;
                vec![AppAction::Render]
            },
            ApiResponse::History { target, generation, result } => {
                self.apply_history(target, generation, result)
            },
        }
    }

    fn apply_history(
        &mut self,
        target: Focus,
        generation: u64,
        result: Result<Vec<ChatMessage>, String>,
    ) -> Vec<AppAction> {
        if generation != self.generation || target != self.focus {
            debug!(?target, generation, current = self.generation, "discarding stale history");
            // A newer fetch for the same target is still pending and owns the
            // recording. Otherwise nothing will ever call `replace`.
            if target != self.focus {
                self.cancel_reload(&target);
            }
            return vec![];
        }

        self.loading = false;
        match (target, result) {
            (Focus::Room(room), Ok(messages)) => {
                self.rooms.entry(room).or_default().messages.replace(messages);
            },
            (Focus::Peer(peer), Ok(messages)) => {
                self.threads.entry(peer).or_default().messages.replace(messages);
            },
            (target @ Focus::Room(_), Err(error)) => {
                warn!(?target, %error, "loading room history failed");
                self.cancel_reload(&target);
                self.status = "Unable to load messages".to_string();
            },
            (target @ Focus::Peer(_), Err(error)) => {
                warn!(?target, %error, "loading private history failed");
                self.cancel_reload(&target);
                self.status = "Unable to load private messages".to_string();
            },
        }
        vec![AppAction::Render]
    }

    fn cancel_reload(&mut self, target: &Focus) {
        let buffer = match target {
            Focus::Room(room) => self.rooms.get_mut(room).map(|state| &mut state.messages),
            Focus::Peer(peer) => self.threads.get_mut(peer).map(|state| &mut state.messages),
        };
        if let Some(buffer) = buffer {
            buffer.cancel_reload();
        }
    }

    /// Insert groups not yet known by id, keeping the list sorted by name.
    fn merge_groups(&mut self, groups: impl IntoIterator<Item = Group>) -> bool {
        let mut changed = false;
        for group in groups {
            if self.groups.iter().any(|known| known.id == group.id) {
                continue;
            }
            self.groups.push(group);
            changed = true;
        }
        if changed {
            self.groups.sort_by(|a, b| a.name.cmp(&b.name));
        }
        changed
    }

    /// History request for the current focus. `None` for a private focus
    /// before the identity is known.
    fn history_request(&mut self) -> Option<AppAction> {
        let generation = self.generation;
        let request = match &self.focus {
            Focus::Room(room) => {
                self.rooms.entry(room.clone()).or_default().messages.begin_reload();
                ApiRequest::RoomHistory { room: room.clone(), generation }
            },
            Focus::Peer(peer) => {
                let me = self.identity.as_ref()?;
                self.threads.entry(peer.clone()).or_default().messages.begin_reload();
                ApiRequest::PrivateHistory { peer: peer.clone(), me: me.id.clone(), generation }
            },
        };
        self.loading = true;
        Some(AppAction::Request(request))
    }

    fn persist(&self) -> AppAction {
        AppAction::Persist(self.prefs.clone())
    }

    fn is_me(&self, user_id: &str) -> bool {
        self.identity.as_ref().is_some_and(|me| me.id == user_id)
    }

    /// Room a join should target: the focused room, or the default room when
    /// a private thread is focused.
    fn join_target(&self) -> String {
        self.focus.room().unwrap_or(&self.config.default_room).to_string()
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    /// Join the chat under `name`, connecting first if needed.
    ///
    /// The name is fixed once the server has acknowledged it.
    pub fn join(&mut self, name: &str) -> Vec<AppAction> {
        let name = name.trim();
        if name.is_empty() {
            self.status = "Enter a display name".to_string();
            return vec![AppAction::Render];
        }
        if let Some(me) = &self.identity
            && me.name != name
        {
            self.status = format!("Signed in as {}. Restart to change this name", me.name);
            return vec![AppAction::Render];
        }

        self.session_requested = true;
        self.pending_join = Some(self.clock);
        self.join_error = None;

        let mut actions = Vec::new();
        if self.prefs.display_name.as_deref() != Some(name) {
            self.prefs.display_name = Some(name.to_string());
            actions.push(self.persist());
        }

        let room = self.join_target();
        match self.state {
            ConnectionState::Connected => {
                self.status = format!("Joining #{room}...");
                actions.push(AppAction::Emit(ClientEvent::join(room, name)));
            },
            // The join is replayed once the channel opens.
            ConnectionState::Connecting => {
                self.status = "Connecting...".to_string();
            },
            ConnectionState::Disconnected => {
                self.state = ConnectionState::Connecting;
                self.last_connect_attempt = Some(self.clock);
                self.status = "Connecting...".to_string();
                actions.push(AppAction::Connect);
            },
        }
        actions.push(AppAction::Render);
        actions
    }

    /// Focus a group room, loading its history and joining it if needed.
    pub fn focus_room(&mut self, room: &str) -> Vec<AppAction> {
        let room = room.trim();
        if room.is_empty() || self.focus.room() == Some(room) {
            return vec![];
        }

        self.focus = Focus::Room(room.to_string());
        self.generation += 1;
        self.rooms.entry(room.to_string()).or_default().unread = 0;

        let mut actions = Vec::new();
        actions.extend(self.history_request());

        if self.state == ConnectionState::Connected
            && self.session_requested
            && !self.session_joined.contains(room)
            && let Some(name) = &self.prefs.display_name
        {
            actions.push(AppAction::Emit(ClientEvent::join(room, name.clone())));
            self.status = format!("Joining #{room}...");
        }

        actions.push(AppAction::Render);
        actions
    }

    /// Focus the private thread with `peer`, loading its history.
    pub fn focus_peer(&mut self, peer: &str) -> Vec<AppAction> {
        let Some(me) = &self.identity else {
            self.status = "Join a room first".to_string();
            return vec![AppAction::Render];
        };
        if peer.is_empty() || me.id == peer || self.focus.peer() == Some(peer) {
            return vec![];
        }

        let peer_name = self.presence.iter().find(|u| u.id == peer).map(|u| u.name.clone());
        self.focus = Focus::Peer(peer.to_string());
        self.generation += 1;

        let thread = self.threads.entry(peer.to_string()).or_default();
        thread.unread = 0;
        if let Some(name) = peer_name {
            thread.peer_name = name;
        }

        let mut actions = Vec::new();
        actions.extend(self.history_request());
        actions.push(AppAction::Render);
        actions
    }

    /// Send `text` to the focused room or peer.
    pub fn send_message(&mut self, text: &str) -> Vec<AppAction> {
        let text = text.trim();
        let connected = self.state == ConnectionState::Connected;

        match &self.focus {
            Focus::Room(room) => {
                if !connected || !self.session_joined.contains(room) {
                    self.status = "Join a room first".to_string();
                    return vec![AppAction::Render];
                }
                if text.is_empty() {
                    return vec![];
                }
                let room = room.clone();
                let mut actions = vec![AppAction::Emit(ClientEvent::chat(room.clone(), text))];
                if self.prefs.drafts.remove(&room).is_some() {
                    actions.push(self.persist());
                }
                actions.push(AppAction::Render);
                actions
            },
            Focus::Peer(peer) => {
                if !connected || self.identity.is_none() {
                    self.status = "Select a user to chat".to_string();
                    return vec![AppAction::Render];
                }
                if text.is_empty() {
                    return vec![];
                }
                vec![AppAction::Emit(ClientEvent::private(peer.clone(), text)), AppAction::Render]
            },
        }
    }

    /// Announce that the user is typing in the focused room.
    ///
    /// Throttled to one notice per `typing_throttle`. Private threads have no
    /// typing indicator.
    pub fn notify_typing(&mut self) -> Vec<AppAction> {
        let Focus::Room(room) = &self.focus else {
            return vec![];
        };
        let Some(me) = &self.identity else {
            return vec![];
        };
        if self.state != ConnectionState::Connected || !self.session_joined.contains(room) {
            return vec![];
        }
        if let Some(last) = self.last_typing_sent
            && self.clock - last < self.config.typing_throttle
        {
            return vec![];
        }

        let event = ClientEvent::Typing(TypingPayload {
            room: room.clone(),
            user_id: me.id.clone(),
            name: me.name.clone(),
        });
        self.last_typing_sent = Some(self.clock);
        vec![AppAction::Emit(event)]
    }

    /// Ask the server to create a room.
    pub fn create_group(&mut self, name: &str) -> Vec<AppAction> {
        let name = name.trim();
        if name.is_empty() {
            return vec![];
        }
        self.status = format!("Creating #{name}...");
        vec![AppAction::Request(ApiRequest::CreateGroup { name: name.to_string() }), AppAction::Render]
    }

    /// Reload the room list.
    pub fn refresh_groups(&self) -> Vec<AppAction> {
        vec![AppAction::Request(ApiRequest::Groups)]
    }

    /// Store unsent input for the focused room.
    ///
    /// Drafts are kept per room only. Returns a persist action when the
    /// stored draft changed.
    pub fn set_draft(&mut self, text: &str) -> Vec<AppAction> {
        let Focus::Room(room) = &self.focus else {
            return vec![];
        };
        let changed = if text.is_empty() {
            self.prefs.drafts.remove(room).is_some()
        } else if self.prefs.drafts.get(room).map(String::as_str) == Some(text) {
            false
        } else {
            self.prefs.drafts.insert(room.clone(), text.to_string());
            true
        };
        if changed { vec![self.persist()] } else { vec![] }
    }

    /// Switch between light and dark themes.
    pub fn toggle_theme(&mut self) -> Vec<AppAction> {
        self.prefs.theme = self.prefs.theme.toggled();
        vec![self.persist(), AppAction::Render]
    }

    /// Show or hide the room sidebar.
    pub fn toggle_sidebar(&mut self) -> Vec<AppAction> {
        self.prefs.sidebar_collapsed = !self.prefs.sidebar_collapsed;
        vec![self.persist(), AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    /// Transient status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Error from the last join attempt. `None` if it succeeded or is still
    /// pending.
    pub fn join_error(&self) -> Option<&str> {
        self.join_error.as_deref()
    }

    /// Whether a join is waiting for its acknowledgement.
    pub fn is_join_pending(&self) -> bool {
        self.pending_join.is_some()
    }

    /// Identity assigned by the server. `None` before the first join ack.
    pub fn identity(&self) -> Option<&UserSummary> {
        self.identity.as_ref()
    }

    /// What the UI is showing.
    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    /// Current focus generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a history fetch for the current focus is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Known rooms, sorted by name.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Names for the room sidebar: known rooms plus joined rooms the server
    /// has not listed, sorted and without duplicates.
    pub fn room_names(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self
            .groups
            .iter()
            .map(|g| g.name.as_str())
            .chain(self.prefs.joined_rooms.iter().map(String::as_str))
            .collect();
        names.into_iter().collect()
    }

    /// State of a room. `None` if nothing was ever loaded for it.
    pub fn room(&self, name: &str) -> Option<&RoomState> {
        self.rooms.get(name)
    }

    /// State of a private thread. `None` if nothing was exchanged yet.
    pub fn thread(&self, peer: &str) -> Option<&ThreadState> {
        self.threads.get(peer)
    }

    /// Messages for the current focus, in arrival order.
    pub fn focused_messages(&self) -> &[ChatMessage] {
        let buffer = match &self.focus {
            Focus::Room(room) => self.rooms.get(room).map(|r| &r.messages),
            Focus::Peer(peer) => self.threads.get(peer).map(|t| &t.messages),
        };
        buffer.map(|b| b.messages()).unwrap_or_default()
    }

    /// Last member list pushed for the focused room. Empty for private
    /// threads and rooms the server reports no members for.
    pub fn focused_members(&self) -> &[RoomMember] {
        self.focus
            .room()
            .and_then(|room| self.rooms.get(room))
            .map(|r| r.members.as_slice())
            .unwrap_or_default()
    }

    /// Unread count for a room.
    pub fn room_unread(&self, room: &str) -> u32 {
        self.rooms.get(room).map_or(0, |r| r.unread)
    }

    /// Unread count for a private thread.
    pub fn peer_unread(&self, peer: &str) -> u32 {
        self.threads.get(peer).map_or(0, |t| t.unread)
    }

    /// Last presence snapshot.
    pub fn presence(&self) -> &[UserSummary] {
        &self.presence
    }

    /// Everyone online except us.
    pub fn other_users(&self) -> Vec<&UserSummary> {
        self.presence.iter().filter(|u| !self.is_me(&u.id)).collect()
    }

    /// Display names typing in `room`.
    pub fn typing_in(&self, room: &str) -> Vec<&str> {
        self.typing.typing_in(room)
    }

    /// Whether the server acknowledged `room` on the current connection.
    pub fn is_joined(&self, room: &str) -> bool {
        self.session_joined.contains(room)
    }

    /// Current preferences.
    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Saved draft for a room.
    pub fn draft(&self, room: &str) -> Option<&str> {
        self.prefs.drafts.get(room).map(String::as_str)
    }

    /// Active theme.
    pub fn theme(&self) -> Theme {
        self.prefs.theme
    }

    /// Whether the sidebar is hidden.
    pub fn sidebar_collapsed(&self) -> bool {
        self.prefs.sidebar_collapsed
    }

    /// Display name of a peer, falling back to the id.
    pub fn peer_name<'a>(&'a self, peer: &'a str) -> &'a str {
        self.threads
            .get(peer)
            .map(|t| t.peer_name.as_str())
            .filter(|name| !name.is_empty())
            .or_else(|| self.presence.iter().find(|u| u.id == peer).map(|u| u.name.as_str()))
            .unwrap_or(peer)
    }
}

impl EventSink for App {
    fn on_connect(&mut self) -> Vec<AppAction> {
        info!("channel connected");
        self.state = ConnectionState::Connected;
        self.ever_connected = true;
        self.identity_acked = false;
        self.session_joined.clear();
        self.status = "Connected to server".to_string();

        let mut actions = Vec::new();
        if self.session_requested
            && let Some(name) = self.prefs.display_name.clone()
        {
            let mut rooms = self.prefs.joined_rooms.clone();
            rooms.insert(self.join_target());
            for room in rooms {
                actions.push(AppAction::Emit(ClientEvent::join(room, name.clone())));
            }
            self.status = format!("Joining #{}...", self.join_target());
        }
        actions.push(AppAction::Render);
        actions
    }

    fn on_disconnect(&mut self) -> Vec<AppAction> {
        info!("channel disconnected");
        self.state = ConnectionState::Disconnected;
        self.identity_acked = false;
        self.session_joined.clear();
        self.last_connect_attempt = Some(self.clock);
        self.status = "Disconnected".to_string();
        vec![AppAction::Render]
    }

    fn on_connect_error(&mut self, error: ErrorPayload) -> Vec<AppAction> {
        let message = error.message.unwrap_or_else(|| "Unable to connect".to_string());
        warn!(%message, "channel failed to connect");
        if self.state == ConnectionState::Connecting {
            self.state = ConnectionState::Disconnected;
        }
        if self.pending_join.take().is_some() {
            self.join_error = Some(message.clone());
        }
        self.status = format!("Connection error: {message}");
        vec![AppAction::Render]
    }

    fn on_joined(&mut self, joined: JoinedPayload) -> Vec<AppAction> {
        let JoinedPayload { room, name, user_id } = joined;
        let room = if room.trim().is_empty() { self.config.default_room.clone() } else { room };
        info!(%room, %user_id, "join acknowledged");

        self.pending_join = None;
        self.join_error = None;
        if !self.identity_acked {
            self.identity = Some(UserSummary::new(user_id, name.clone()));
            self.identity_acked = true;
        }

        let mut prefs_changed = false;
        if self.prefs.display_name.as_deref() != Some(name.as_str()) {
            self.prefs.display_name = Some(name);
            prefs_changed = true;
        }
        prefs_changed |= self.prefs.joined_rooms.insert(room.clone());
        self.session_joined.insert(room.clone());
        self.rooms.entry(room.clone()).or_default();
        self.status = format!("Joined #{room}");

        let mut actions = Vec::new();
        if self.focus.room() == Some(room.as_str()) {
            actions.extend(self.history_request());
        }
        if prefs_changed {
            actions.push(self.persist());
        }
        actions.push(AppAction::Render);
        actions
    }

    fn on_users(&mut self, users: Vec<UserSummary>) -> Vec<AppAction> {
        for user in &users {
            if let Some(thread) = self.threads.get_mut(&user.id) {
                thread.peer_name.clone_from(&user.name);
            }
        }
        self.presence = users;
        vec![AppAction::Render]
    }

    fn on_chat(&mut self, message: ChatMessage) -> Vec<AppAction> {
        if message.is_private {
            debug!(id = message.id, "private message on the chat event, dropping");
            return vec![];
        }
        if !self.prefs.joined_rooms.contains(&message.room) {
            debug!(id = message.id, room = %message.room, "message for a room we never joined");
            return vec![];
        }

        let room = message.room.clone();
        let author = message.author_id.clone();
        let counts_as_unread = self.focus.room() != Some(room.as_str()) && !self.is_me(&author);

        let state = self.rooms.entry(room.clone()).or_default();
        if !state.messages.push(message) {
            return vec![];
        }
        if counts_as_unread {
            state.unread += 1;
        }
        self.typing.clear(&room, &author);
        vec![AppAction::Render]
    }

    fn on_private(&mut self, message: ChatMessage) -> Vec<AppAction> {
        let Some(me) = &self.identity else {
            debug!(id = message.id, "private message before identity is known");
            return vec![];
        };
        let Some(peer) = message.peer_of(&me.id).map(str::to_string) else {
            debug!(id = message.id, "private message not addressed to us");
            return vec![];
        };

        let mine = message.author_id == me.id;
        let peer_name =
            if mine { message.recipient.clone().unwrap_or_default() } else { message.author.clone() };
        let counts_as_unread = self.focus.peer() != Some(peer.as_str()) && !mine;

        let thread = self.threads.entry(peer).or_default();
        if !thread.messages.push(message) {
            return vec![];
        }
        if !peer_name.is_empty() {
            thread.peer_name = peer_name;
        }
        if counts_as_unread {
            thread.unread += 1;
        }
        vec![AppAction::Render]
    }

    fn on_group_created(&mut self, group: Group) -> Vec<AppAction> {
        if self.merge_groups([group]) { vec![AppAction::Render] } else { vec![] }
    }

    fn on_groups(&mut self, groups: Vec<Group>) -> Vec<AppAction> {
        if self.merge_groups(groups) { vec![AppAction::Render] } else { vec![] }
    }

    fn on_typing(&mut self, typing: TypingPayload) -> Vec<AppAction> {
        if self.is_me(&typing.user_id) {
            return vec![];
        }
        let shown = self.typing.notice(&typing.room, &typing.user_id, &typing.name, self.clock);
        if shown { vec![AppAction::Render] } else { vec![] }
    }

    fn on_error(&mut self, error: ErrorPayload) -> Vec<AppAction> {
        let message = error.message.unwrap_or_else(|| "Server error".to_string());
        warn!(%message, "server reported an error");
        if self.pending_join.take().is_some() {
            self.join_error = Some(message.clone());
        }
        self.status = message;
        vec![AppAction::Render]
    }

    fn on_room_members(&mut self, members: RoomMembersPayload) -> Vec<AppAction> {
        self.rooms.entry(members.room).or_default().members = members.members;
        vec![AppAction::Render]
    }

    fn on_joined_rooms(&mut self, rooms: Vec<String>) -> Vec<AppAction> {
        let mut prefs_changed = false;
        for room in rooms {
            if room.trim().is_empty() {
                continue;
            }
            prefs_changed |= self.prefs.joined_rooms.insert(room.clone());
            self.session_joined.insert(room);
        }

        let mut actions = Vec::new();
        if prefs_changed {
            actions.push(self.persist());
        }
        actions.push(AppAction::Render);
        actions
    }
}
