//! Chat area
//!
//! Displays messages for the focused room or private thread, followed by a
//! typing indicator line.

use parlor_app::{App, Focus};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use super::Palette;

const BORDER_SIZE: u16 = 2;

/// Typing indicator text for the given names.
fn typing_label(names: &[&str]) -> Option<String> {
    match names {
        [] => None,
        [one] => Some(format!("{one} is typing...")),
        [first, second] => Some(format!("{first} and {second} are typing...")),
        _ => Some("Several people are typing...".to_string()),
    }
}

fn placeholder(app: &App) -> &'static str {
    if app.identity().is_none() {
        "Type /join <name> to start chatting"
    } else if app.is_loading() {
        "Loading messages..."
    } else {
        "No messages yet"
    }
}

/// Render the chat area.
pub fn render(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let mut title = match app.focus() {
        Focus::Room(room) => format!(" #{room} "),
        Focus::Peer(peer) => format!(" @{} ", app.peer_name(peer)),
    };
    if app.is_loading() {
        title.push_str("(loading) ");
    }

    let block = Block::default().borders(Borders::ALL).title(title);

    let me = app.identity().map(|u| u.id.as_str());
    let messages = app.focused_messages();

    let mut items: Vec<ListItem> = if messages.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(placeholder(app), Style::default().fg(palette.muted))))]
    } else {
        messages
            .iter()
            .map(|msg| {
                let color = if Some(msg.author_id.as_str()) == me { palette.accent } else { palette.author };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("<{}>", msg.author), Style::default().fg(color).add_modifier(Modifier::BOLD)),
                    Span::raw(" "),
                    Span::raw(msg.content.clone()),
                ]))
            })
            .collect()
    };

    let typing = app.focus().room().and_then(|room| typing_label(&app.typing_in(room)));

    let mut visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    if typing.is_some() {
        visible_height = visible_height.saturating_sub(1);
    }
    let skip = items.len().saturating_sub(visible_height);
    items.drain(..skip);

    if let Some(label) = typing {
        let style = Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC);
        items.push(ListItem::new(Line::from(Span::styled(label, style))));
    }

    frame.render_widget(List::new(items).block(block), area);
}
