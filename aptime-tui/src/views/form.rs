//! Modal entry form for adding or editing a record.

use crate::state::{App, FormState};
use crate::widgets::ModalFrame;
use aptime_core::ReferenceSet;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, form: &FormState, area: Rect) {
    let title = form.title();
    let inner = ModalFrame {
        title: &title,
        border_style: Style::default().fg(app.theme.border_focus),
        percent_x: 60,
        percent_y: 70,
    }
    .render(f, area);

    let empty = ReferenceSet::new();
    let refs = app
        .pages
        .get(&form.kind)
        .map(|page| &page.references)
        .unwrap_or(&empty);

    let mut lines = Vec::new();
    for (index, field) in form.fields().iter().enumerate() {
        let focused = index == form.focus;
        let label_style = if focused {
            Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.secondary)
        };
        let value = form.display_value(index, refs);
        let value = match (field.reference.is_some(), focused) {
            (true, true) => format!("< {} >", value),
            (false, true) => format!("{}_", value),
            _ => value,
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<24}", field.label), label_style),
            Span::styled(value, Style::default().fg(app.theme.text)),
        ]));
        if let Some(error) = form.errors.get(field.field) {
            lines.push(Line::from(Span::styled(
                format!("  {}", error),
                Style::default().fg(app.theme.error),
            )));
        }
    }

    lines.push(Line::from(""));
    let hint = if form.submitting {
        "Saving..."
    } else {
        "Tab/↓ next field • ←/→ choose option • Enter save • Esc cancel"
    };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(app.theme.text_dim))));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
