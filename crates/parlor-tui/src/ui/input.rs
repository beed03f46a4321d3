//! Input line
//!
//! Displays the input buffer with cursor.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
};

use super::Palette;
use crate::InputState;

const PROMPT_WIDTH: u16 = 3; // "> "
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the input line.
pub fn render(frame: &mut Frame, input: &InputState, palette: &Palette, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    // Keep the cursor in view by scrolling long input to the left.
    let available_width = area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING) as usize;
    let scroll = input.cursor().saturating_sub(available_width);
    let shown: String = input.buffer().chars().skip(scroll).collect();

    let paragraph = Paragraph::new(format!("> {shown}")).style(Style::default().fg(palette.text)).block(block);

    frame.render_widget(paragraph, area);

    let cursor_offset = input.cursor().saturating_sub(scroll) as u16;
    let cursor_x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);

    frame.set_cursor_position((cursor_x.min(max_x), cursor_y));
}
