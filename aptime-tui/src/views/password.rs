//! Change password screen.

use super::login::{error_lines, input_line, masked};
use crate::state::App;
use crate::widgets::ModalFrame;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let state = &app.password;
    let inner = ModalFrame {
        title: "Change Password",
        border_style: Style::default().fg(app.theme.border_focus),
        percent_x: 60,
        percent_y: 50,
    }
    .render(f, area);

    let mut lines = vec![
        input_line(app, "Current Password", masked(&state.current), state.focus == 0),
        input_line(app, "New Password", masked(&state.new), state.focus == 1),
        input_line(app, "Confirm Password", masked(&state.confirm), state.focus == 2),
        Line::from(""),
    ];
    lines.extend(error_lines(app, &state.errors));
    lines.push(Line::from(""));
    let hint = if state.submitting {
        "Updating..."
    } else {
        "Tab switch field • Enter change password • Esc back"
    };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(app.theme.text_dim))));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
