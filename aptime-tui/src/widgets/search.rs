//! Search input shown above every entity table.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct SearchBar<'a> {
    pub term: &'a str,
    pub placeholder: &'a str,
    pub editing: bool,
    pub text_style: Style,
    pub placeholder_style: Style,
    pub border_style: Style,
}

impl<'a> SearchBar<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let mut spans = Vec::new();
        if self.term.is_empty() && !self.editing {
            spans.push(Span::styled(self.placeholder, self.placeholder_style));
        } else {
            spans.push(Span::styled(self.term, self.text_style));
        }
        if self.editing {
            spans.push(Span::styled("_", self.text_style));
        }

        let title = if self.editing { "Search (Enter to keep, Esc to clear)" } else { "Search (/)" };
        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(self.border_style),
        );
        f.render_widget(paragraph, area);
    }
}
