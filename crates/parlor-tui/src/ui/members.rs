//! Member pane
//!
//! Everyone who has joined the focused room, online members first. Only
//! shown while the server has reported members for that room.

use parlor_app::App;
use parlor_proto::RoomMember;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use super::Palette;

const SELF_MARKER: &str = " (you)";

fn heading(label: &str, count: usize, palette: &Palette) -> ListItem<'static> {
    ListItem::new(Line::from(Span::styled(
        format!("{label} ({count})"),
        Style::default().fg(palette.muted).add_modifier(Modifier::BOLD),
    )))
}

fn member(member: &RoomMember, is_me: bool, palette: &Palette) -> ListItem<'static> {
    let style = if member.is_online { Style::default() } else { Style::default().fg(palette.muted) };
    let mut spans = vec![Span::raw(" "), Span::styled(member.name.clone(), style)];
    if is_me {
        spans.push(Span::styled(SELF_MARKER, Style::default().fg(palette.accent)));
    }
    ListItem::new(Line::from(spans))
}

/// Render the member pane for the focused room.
pub fn render(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let members = app.focused_members();
    let my_id = app.identity().map(|me| me.id.as_str());
    let (online, offline): (Vec<&RoomMember>, Vec<&RoomMember>) = members.iter().partition(|m| m.is_online);

    let mut items = Vec::with_capacity(members.len() + 2);
    for (label, group) in [("Online", &online), ("Offline", &offline)] {
        if group.is_empty() {
            continue;
        }
        items.push(heading(label, group.len(), palette));
        items.extend(group.iter().map(|m| member(m, my_id == Some(m.id.as_str()), palette)));
    }

    let block = Block::default().borders(Borders::ALL).title(" Members ");
    frame.render_widget(List::new(items).block(block), area);
}
