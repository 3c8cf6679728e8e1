//! Searchable paginated table for one entity page.

use crate::state::{App, PageState};
use crate::widgets::{DetailPanel, PaginationBar, SearchBar};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

/// Placeholder rows drawn while a load is in flight.
const SKELETON_ROWS: usize = 5;

pub fn render(f: &mut Frame<'_>, app: &App, page: &PageState, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let search_border = if page.search_editing { app.theme.border_focus } else { app.theme.border };
    SearchBar {
        term: page.table.search_term(),
        placeholder: "Type / to search...",
        editing: page.search_editing,
        text_style: Style::default().fg(app.theme.text),
        placeholder_style: Style::default().fg(app.theme.text_muted),
        border_style: Style::default().fg(search_border),
    }
    .render(f, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(layout[1]);

    if page.loading {
        render_skeleton(f, app, page, body[0]);
    } else if page.filtered_len() == 0 {
        let empty = Paragraph::new("No data available.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.text_dim))
            .block(Block::default().title(page.kind.title()).borders(Borders::ALL));
        f.render_widget(empty, body[0]);
    } else {
        render_table(f, app, page, body[0]);
    }
    render_detail(f, app, page, body[1]);

    if !page.loading {
        let rows = page.rows();
        let filtered = page.filtered_len();
        let first = page.table.first_item_index();
        let shown = page.visible().len();
        let summary = if shown == 0 {
            format!("0 of {}", filtered)
        } else {
            format!("Showing {}-{} of {}", first + 1, first + shown, filtered)
        };
        PaginationBar {
            pages: page.table.page_numbers(rows),
            current: page.table.current_page(),
            has_previous: page.table.has_previous(),
            has_next: page.table.has_next(rows),
            summary,
            active_style: Style::default().fg(app.theme.bg).bg(app.theme.primary),
            inactive_style: Style::default().fg(app.theme.text),
            disabled_style: Style::default().fg(app.theme.text_muted),
        }
        .render(f, layout[2]);
    }
}

fn widths(page: &PageState) -> Vec<Constraint> {
    let mut widths = vec![Constraint::Length(6)];
    let columns = page.table.columns().len().max(1) as u32;
    widths.extend(page.table.columns().iter().map(|_| Constraint::Ratio(1, columns)));
    widths
}

fn header(app: &App, page: &PageState) -> Row<'static> {
    let mut cells = vec![Cell::from("S.No")];
    cells.extend(page.table.columns().iter().map(|c| Cell::from(c.header)));
    Row::new(cells).style(
        Style::default()
            .fg(app.theme.secondary)
            .add_modifier(Modifier::BOLD),
    )
}

fn render_table(f: &mut Frame<'_>, app: &App, page: &PageState, area: Rect) {
    let first = page.table.first_item_index();
    let rows: Vec<Row> = page
        .visible()
        .into_iter()
        .enumerate()
        .map(|(offset, record)| {
            let mut cells = vec![Cell::from((first + offset + 1).to_string())];
            cells.extend(
                page.table
                    .columns()
                    .iter()
                    .map(|c| Cell::from(record.get(c.field).to_string())),
            );
            Row::new(cells).style(Style::default().fg(app.theme.text))
        })
        .collect();

    let mut state = TableState::default();
    state.select(Some(page.selected));

    let table = Table::new(rows, widths(page))
        .header(header(app, page))
        .block(
            Block::default()
                .title(page.kind.title())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focus)),
        )
        .highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .bg(app.theme.bg_highlight),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(table, area, &mut state);
}

fn render_skeleton(f: &mut Frame<'_>, app: &App, page: &PageState, area: Rect) {
    let columns = page.table.columns().len() + 1;
    let rows: Vec<Row> = (0..SKELETON_ROWS)
        .map(|_| {
            Row::new(vec![Cell::from("░░░░"); columns])
                .style(Style::default().fg(app.theme.text_muted))
        })
        .collect();
    let table = Table::new(rows, widths(page))
        .header(header(app, page))
        .block(
            Block::default()
                .title(Line::from(format!("{} (loading...)", page.kind.title())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(table, area);
}

fn render_detail(f: &mut Frame<'_>, app: &App, page: &PageState, area: Rect) {
    let mut fields = Vec::new();
    if !page.loading {
        if let Some(record) = page.selected_row() {
            let id_field = page.table.id_field();
            if let Ok(id) = page.table.resolve_identity(record) {
                fields.push(("ID", id.value().to_string()));
            } else {
                fields.push(("ID", format!("missing {}", id_field)));
            }
            for column in page.table.columns() {
                fields.push((column.header, record.get(column.field).to_string()));
            }
        }
    }
    DetailPanel {
        title: "Details",
        fields,
        label_style: Style::default().fg(app.theme.secondary),
        border_style: Style::default().fg(app.theme.border),
    }
    .render(f, area);
}
