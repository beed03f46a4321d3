//! Status bar
//!
//! Displays connection status, the signed-in name and the latest status or
//! join error.

use parlor_app::{App, ConnectionState};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Palette;

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let connection_status = match (app.connection_state(), app.identity()) {
        (ConnectionState::Disconnected, _) => Span::styled("Disconnected", Style::default().fg(Color::Red)),
        (ConnectionState::Connecting, _) => Span::styled("Connecting...", Style::default().fg(Color::Yellow)),
        (ConnectionState::Connected, Some(me)) => Span::styled(
            format!("Connected as {}", me.name),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        (ConnectionState::Connected, None) => Span::styled("Connected", Style::default().fg(Color::Green)),
    };

    let detail = match app.join_error() {
        Some(error) => Span::styled(format!(" | {error}"), Style::default().fg(palette.error)),
        None if app.status().is_empty() => Span::raw(""),
        None => Span::styled(format!(" | {}", app.status()), Style::default().fg(palette.text)),
    };

    let status_line = Line::from(vec![Span::raw(" "), connection_status, detail]);

    let paragraph = Paragraph::new(status_line).style(Style::default().bg(palette.bar).fg(palette.text));

    frame.render_widget(paragraph, area);
}
