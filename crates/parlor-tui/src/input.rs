//! Input state and key handling for the TUI.
//!
//! This module owns all text input state (buffer, cursor) and handles
//! character-level key events. Command parsing happens here on Enter.
//!
//! The buffer doubles as the draft of the focused room: every edit is mirrored
//! into the App, and switching focus loads the new room's draft. Lines that
//! start with `/` are commands and are never stored as drafts.

use parlor_app::{App, AppAction};

use crate::commands::{self, Command};

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Tab key.
    Tab,
    /// Escape key.
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// Input state for the TUI.
///
/// Manages the text input buffer and cursor position.
/// Handles all character-level key events.
#[derive(Debug, Default)]
pub struct InputState {
    /// Text buffer for user input.
    buffer: String,
    /// Cursor position within the buffer, in characters.
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position, in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the buffer with the focused room's saved draft.
    ///
    /// Private threads have no drafts, so the buffer is cleared for them.
    pub fn load_draft(&mut self, app: &App) {
        self.buffer = app.focus().room().and_then(|room| app.draft(room)).unwrap_or_default().to_string();
        self.cursor = self.buffer.chars().count();
    }

    /// Handle a key input event.
    ///
    /// Returns actions to process (may be empty for input-only keys,
    /// or contain protocol actions for commands).
    pub fn handle_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_index();
                self.buffer.insert(at, c);
                self.cursor = self.cursor.saturating_add(1);
                self.edited(app)
            },
            KeyInput::Backspace => {
                if self.cursor == 0 {
                    return vec![];
                }
                self.cursor = self.cursor.saturating_sub(1);
                let at = self.byte_index();
                self.buffer.remove(at);
                self.edited(app)
            },
            KeyInput::Delete => {
                if self.cursor >= self.len() {
                    return vec![];
                }
                let at = self.byte_index();
                self.buffer.remove(at);
                self.edited(app)
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                vec![AppAction::Render]
            },
            KeyInput::Right => {
                if self.cursor < self.len() {
                    self.cursor = self.cursor.saturating_add(1);
                }
                vec![AppAction::Render]
            },
            KeyInput::Home => {
                self.cursor = 0;
                vec![AppAction::Render]
            },
            KeyInput::End => {
                self.cursor = self.len();
                vec![AppAction::Render]
            },
            KeyInput::Enter => self.handle_enter(app),
            KeyInput::Tab => self.handle_tab(app),
            KeyInput::Down => self.cycle_peer(app, true),
            KeyInput::Up => self.cycle_peer(app, false),
            KeyInput::Esc => app.quit(),
        }
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self) -> usize {
        self.buffer.char_indices().nth(self.cursor).map_or(self.buffer.len(), |(i, _)| i)
    }

    /// Mirror the buffer into the room draft and announce typing.
    fn edited(&self, app: &mut App) -> Vec<AppAction> {
        let mut actions = Vec::new();
        if self.buffer.starts_with('/') {
            actions.extend(app.set_draft(""));
        } else {
            actions.extend(app.set_draft(&self.buffer));
            if !self.buffer.is_empty() {
                actions.extend(app.notify_typing());
            }
        }
        actions.push(AppAction::Render);
        actions
    }

    /// Run a focus change, then show the new focus's draft.
    fn refocus(&mut self, app: &mut App, change: impl FnOnce(&mut App) -> Vec<AppAction>) -> Vec<AppAction> {
        let before = app.generation();
        let mut actions = change(app);
        if app.generation() != before {
            self.load_draft(app);
            actions.push(AppAction::Render);
        }
        actions
    }

    /// Handle Enter key - parse command and call App API.
    fn handle_enter(&mut self, app: &mut App) -> Vec<AppAction> {
        let text = std::mem::take(&mut self.buffer);
        self.cursor = 0;

        if text.trim().is_empty() {
            return vec![AppAction::Render];
        }

        match commands::parse(&text) {
            Command::Join { name } => app.join(&name),
            Command::Room { name } => self.refocus(app, |app| app.focus_room(&name)),
            Command::Dm { user } => {
                let peer = app
                    .other_users()
                    .into_iter()
                    .find(|u| u.id == user || u.name.eq_ignore_ascii_case(&user))
                    .map(|u| u.id.clone());
                match peer {
                    Some(peer) => self.refocus(app, |app| app.focus_peer(&peer)),
                    None => {
                        app.set_status(format!("No user named {user} is online"));
                        vec![AppAction::Render]
                    },
                }
            },
            Command::Create { name } => app.create_group(&name),
            Command::Groups => app.refresh_groups(),
            Command::Theme => app.toggle_theme(),
            Command::Sidebar => app.toggle_sidebar(),
            Command::Quit => app.quit(),
            Command::Message { content } => {
                let actions = app.send_message(&content);
                // Not sent: give the text back so it is not lost.
                if !actions.iter().any(|a| matches!(a, AppAction::Emit(_))) {
                    self.cursor = content.chars().count();
                    self.buffer = content;
                }
                actions
            },
            Command::Unknown { input } => {
                app.set_status(format!("Unknown command: {input}"));
                vec![AppAction::Render]
            },
            Command::InvalidArgs { command, error } => {
                app.set_status(format!("/{command}: {error}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Handle Tab key - cycle through rooms.
    ///
    /// Cycles to the next room in sidebar order, wrapping around. From a
    /// private thread it goes back to the first room.
    fn handle_tab(&mut self, app: &mut App) -> Vec<AppAction> {
        let rooms: Vec<String> = app.room_names().into_iter().map(str::to_string).collect();
        if rooms.is_empty() {
            return vec![];
        }

        let current_idx = app.focus().room().and_then(|focused| rooms.iter().position(|r| r == focused));
        let next_idx = current_idx.map_or(0, |idx| (idx + 1) % rooms.len());

        match rooms.get(next_idx) {
            Some(next) => self.refocus(app, |app| app.focus_room(next)),
            None => vec![],
        }
    }

    /// Handle Up/Down - cycle through private threads with online users.
    fn cycle_peer(&mut self, app: &mut App, forward: bool) -> Vec<AppAction> {
        let peers: Vec<String> = app.other_users().into_iter().map(|u| u.id.clone()).collect();
        if peers.is_empty() {
            return vec![];
        }

        let len = peers.len();
        let current_idx = app.focus().peer().and_then(|focused| peers.iter().position(|p| p == focused));
        let next_idx = match (current_idx, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(idx), true) => (idx + 1) % len,
            (Some(idx), false) => (idx + len - 1) % len,
        };

        match peers.get(next_idx) {
            Some(next) => self.refocus(app, |app| app.focus_peer(next)),
            None => vec![],
        }
    }
}
