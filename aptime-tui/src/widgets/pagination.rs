//! Page navigation strip under a table.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::ops::RangeInclusive;

pub struct PaginationBar {
    pub pages: RangeInclusive<usize>,
    pub current: usize,
    pub has_previous: bool,
    pub has_next: bool,
    /// "Showing a-b of n" summary.
    pub summary: String,
    pub active_style: Style,
    pub inactive_style: Style,
    pub disabled_style: Style,
}

impl PaginationBar {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let mut spans = Vec::new();
        spans.push(Span::styled(
            " < Prev ",
            if self.has_previous { self.inactive_style } else { self.disabled_style },
        ));
        for page in self.pages.clone() {
            let style = if page == self.current { self.active_style } else { self.inactive_style };
            spans.push(Span::styled(format!(" {} ", page), style));
        }
        spans.push(Span::styled(
            " Next > ",
            if self.has_next { self.inactive_style } else { self.disabled_style },
        ));
        spans.push(Span::styled(format!("  {}", self.summary), self.inactive_style));

        let paragraph = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}
