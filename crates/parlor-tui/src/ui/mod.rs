//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod chat;
mod input;
mod members;
mod rooms;
mod status;

use parlor_app::{App, Theme};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Block,
};

use crate::InputState;

/// Colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Screen background.
    pub background: Color,
    /// Regular text.
    pub text: Color,
    /// Hints, placeholders and secondary details.
    pub muted: Color,
    /// Focused room or thread.
    pub accent: Color,
    /// Rooms and threads with unread messages.
    pub unread: Color,
    /// Message authors.
    pub author: Color,
    /// Failures.
    pub error: Color,
    /// Status bar background.
    pub bar: Color,
}

impl Palette {
    /// Palette for `theme`.
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color::Reset,
                text: Color::White,
                muted: Color::DarkGray,
                accent: Color::Yellow,
                unread: Color::Cyan,
                author: Color::Green,
                error: Color::Red,
                bar: Color::DarkGray,
            },
            Theme::Light => Self {
                background: Color::White,
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                unread: Color::Magenta,
                author: Color::Green,
                error: Color::Red,
                bar: Color::Gray,
            },
        }
    }
}

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App, input_state: &InputState) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let palette = Palette::for_theme(app.theme());
    let background = Block::default().style(Style::default().bg(palette.background).fg(palette.text));
    frame.render_widget(background, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, app, &palette, *main_area);
    input::render(frame, input_state, &palette, *input_area);
    status::render(frame, app, &palette, *status_area);
}

/// Render the main area (sidebar + chat + members).
fn render_main_area(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    const SIDEBAR_WIDTH: u16 = 22;
    const CHAT_AREA_MIN_WIDTH: u16 = 20;

    if app.sidebar_collapsed() {
        render_conversation(frame, app, palette, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(CHAT_AREA_MIN_WIDTH)])
        .split(area);

    let [sidebar_area, chat_area] = chunks.as_ref() else {
        return;
    };

    rooms::render(frame, app, palette, *sidebar_area);
    render_conversation(frame, app, palette, *chat_area);
}

/// Render the chat, with the member pane beside it when the focused room
/// has reported members.
fn render_conversation(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    const MEMBERS_WIDTH: u16 = 20;
    const CHAT_AREA_MIN_WIDTH: u16 = 20;

    if app.focused_members().is_empty() {
        chat::render(frame, app, palette, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(CHAT_AREA_MIN_WIDTH), Constraint::Length(MEMBERS_WIDTH)])
        .split(area);

    let [chat_area, members_area] = chunks.as_ref() else {
        return;
    };

    chat::render(frame, app, palette, *chat_area);
    members::render(frame, app, palette, *members_area);
}
