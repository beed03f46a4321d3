//! Sidebar
//!
//! Rooms with unread counts on top, online users (private threads) below.

use parlor_app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use super::Palette;

const ACTIVE_PREFIX: &str = ">";
const INACTIVE_PREFIX: &str = " ";
const ROOM_PREFIX: &str = "#";
const PEER_PREFIX: &str = "@";

enum EntryState {
    Active,
    Unread(u32),
    Normal,
}

fn entry(label: String, state: &EntryState, dimmed: bool, palette: &Palette) -> ListItem<'static> {
    let (prefix, suffix, style) = match state {
        EntryState::Active => {
            (ACTIVE_PREFIX, String::new(), Style::default().fg(palette.accent).add_modifier(Modifier::BOLD))
        },
        EntryState::Unread(count) => {
            (INACTIVE_PREFIX, format!(" ({count})"), Style::default().fg(palette.unread))
        },
        EntryState::Normal if dimmed => (INACTIVE_PREFIX, String::new(), Style::default().fg(palette.muted)),
        EntryState::Normal => (INACTIVE_PREFIX, String::new(), Style::default()),
    };

    ListItem::new(Line::from(vec![
        Span::raw(prefix),
        Span::styled(label, style),
        Span::styled(suffix, Style::default().fg(palette.unread).add_modifier(Modifier::BOLD)),
    ]))
}

/// Render the sidebar.
pub fn render(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    const USERS_HEIGHT_PERCENT: u16 = 40;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Percentage(USERS_HEIGHT_PERCENT)])
        .split(area);

    let [rooms_area, users_area] = chunks.as_ref() else {
        return;
    };

    let focused_room = app.focus().room();
    let rooms: Vec<ListItem> = app
        .room_names()
        .into_iter()
        .map(|room| {
            let state = if focused_room == Some(room) {
                EntryState::Active
            } else {
                match app.room_unread(room) {
                    0 => EntryState::Normal,
                    n => EntryState::Unread(n),
                }
            };
            // Rooms we have not joined on this connection are dimmed.
            entry(format!("{ROOM_PREFIX}{room}"), &state, !app.is_joined(room), palette)
        })
        .collect();

    let focused_peer = app.focus().peer();
    let users: Vec<ListItem> = app
        .other_users()
        .into_iter()
        .map(|user| {
            let state = if focused_peer == Some(user.id.as_str()) {
                EntryState::Active
            } else {
                match app.peer_unread(&user.id) {
                    0 => EntryState::Normal,
                    n => EntryState::Unread(n),
                }
            };
            entry(format!("{PEER_PREFIX}{}", user.name), &state, false, palette)
        })
        .collect();

    let rooms_block = Block::default().borders(Borders::ALL).title(" Rooms ");
    let users_block = Block::default().borders(Borders::ALL).title(" Online ");

    frame.render_widget(List::new(rooms).block(rooms_block), *rooms_area);
    frame.render_widget(List::new(users).block(users_block), *users_area);
}
