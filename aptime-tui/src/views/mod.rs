//! View rendering dispatch.

pub mod form;
pub mod grid;
pub mod login;
pub mod password;
pub mod table;

use crate::nav::View;
use crate::state::App;
use crate::theme::notification_color;
use crate::widgets::ModalFrame;
use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match app.active_view {
        View::Login => login::render(f, app, layout[1]),
        View::ChangePassword => password::render(f, app, layout[1]),
        View::TimetableGrid => grid::render(f, app, layout[1]),
        view => {
            if let Some(page) = view.entity().and_then(|kind| app.pages.get(&kind)) {
                table::render(f, app, page, layout[1]);
            }
        }
    }

    render_footer(f, app, layout[2]);

    let screen = f.size();
    if let Some(form_state) = &app.form {
        form::render(f, app, form_state, screen);
    }
    if app.confirm.is_some() {
        render_confirm(f, app, screen);
    }
    if app.modal.is_some() {
        render_modal(f, app, screen);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let tabs: Vec<Span> = View::all()
        .iter()
        .enumerate()
        .filter(|(_, view)| view.entity().is_some())
        .map(|(index, view)| {
            let style = if *view == app.active_view {
                Style::default().fg(app.theme.bg).bg(app.theme.primary)
            } else {
                Style::default().fg(app.theme.text_dim)
            };
            let label = if index < 10 {
                format!(" {}:{} ", (index + 1) % 10, view.title())
            } else {
                format!(" {} ", view.title())
            };
            Span::styled(label, style)
        })
        .collect();

    let title = format!(
        "APTIME | {} | {}",
        app.active_view.title(),
        app.session.display_name()
    );
    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        title,
        Style::default().fg(app.theme.primary),
    ));
    f.render_widget(Paragraph::new(Line::from(tabs)).block(block), area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = "Tab switch view • j/k move • h/l page • / search • n new • e edit • d delete • ? help • q quit";
    let (text, style) = match app.current_notification(Utc::now()) {
        Some(note) => (
            note.display(),
            Style::default().fg(notification_color(note.level, &app.theme)),
        ),
        None => (help.to_string(), Style::default().fg(app.theme.text_dim)),
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}

fn render_confirm(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(confirm) = &app.confirm else { return };
    let inner = ModalFrame {
        title: "Confirm Delete",
        border_style: Style::default().fg(app.theme.error),
        percent_x: 50,
        percent_y: 25,
    }
    .render(f, area);
    let lines = vec![
        Line::from(format!(
            "Delete {} '{}'?",
            confirm.kind.noun(),
            confirm.label
        )),
        Line::from(""),
        Line::from(Span::styled(
            "y / Enter to delete, n / Esc to cancel",
            Style::default().fg(app.theme.text_dim),
        )),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn render_modal(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(modal) = &app.modal else { return };
    let inner = ModalFrame {
        title: &modal.title,
        border_style: Style::default().fg(app.theme.border_focus),
        percent_x: 70,
        percent_y: 50,
    }
    .render(f, area);
    let paragraph = Paragraph::new(modal.message.as_str())
        .style(Style::default().fg(app.theme.text))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, inner);
}
