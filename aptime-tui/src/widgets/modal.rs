//! Centered overlay frame used by forms, prompts and help.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Clear},
    Frame,
};

/// `percent_x` by `percent_y` rectangle centered in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub struct ModalFrame<'a> {
    pub title: &'a str,
    pub border_style: Style,
    pub percent_x: u16,
    pub percent_y: u16,
}

impl<'a> ModalFrame<'a> {
    /// Clears the overlay area, draws the border and returns the inner area.
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) -> Rect {
        let rect = centered_rect(self.percent_x.min(100), self.percent_y.min(100), area);
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(self.border_style);
        let inner = block.inner(rect);
        f.render_widget(Clear, rect);
        f.render_widget(block, rect);
        inner
    }
}
