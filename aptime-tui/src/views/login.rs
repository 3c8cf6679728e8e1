//! Login screen.

use crate::state::App;
use crate::widgets::ModalFrame;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

pub(crate) fn masked(value: &str) -> String {
    "*".repeat(value.chars().count())
}

pub(crate) fn input_line<'a>(
    app: &App,
    label: &'a str,
    value: String,
    focused: bool,
) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.secondary)
    };
    let value = if focused { format!("{}_", value) } else { value };
    Line::from(vec![
        Span::styled(format!("{:<22}", label), label_style),
        Span::styled(value, Style::default().fg(app.theme.text)),
    ])
}

pub(crate) fn error_lines<'a>(app: &App, errors: &'a [String]) -> Vec<Line<'a>> {
    errors
        .iter()
        .map(|e| Line::from(Span::styled(e.as_str(), Style::default().fg(app.theme.error))))
        .collect()
}

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let login = &app.login;
    let inner = ModalFrame {
        title: "Sign in",
        border_style: Style::default().fg(app.theme.border_focus),
        percent_x: 50,
        percent_y: 50,
    }
    .render(f, area);

    let mut lines = vec![
        input_line(app, "Username", login.username.clone(), login.focus == 0),
        input_line(app, "Password", masked(&login.password), login.focus == 1),
        Line::from(""),
    ];
    lines.extend(error_lines(app, &login.errors));
    lines.push(Line::from(""));
    let hint = if login.submitting {
        "Signing in..."
    } else {
        "Tab switch field • Enter sign in • Ctrl-c quit"
    };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(app.theme.text_dim))));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
