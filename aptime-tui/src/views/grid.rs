//! Timetable grid: days by time slots with manual course and room assignment.

use crate::state::App;
use crate::theme::slot_color;
use crate::widgets::DetailPanel;
use aptime_core::format_clock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

const DAY_WIDTH: u16 = 6;
const SLOT_WIDTH: u16 = 20;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let grid_state = &app.grid;
    let (Some(summary), Some(grid)) = (&grid_state.summary, &grid_state.grid) else {
        let message = if grid_state.loading {
            "Loading timetable..."
        } else {
            "No timetable open. Select one in Timetables and press v."
        };
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.text_dim))
            .block(Block::default().title("Timetable Grid").borders(Borders::ALL));
        f.render_widget(paragraph, area);
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    let total = grid.slots().len() * grid.days().len();
    let percent = if total == 0 {
        0.0
    } else {
        grid.assigned_count() as f32 * 100.0 / total as f32
    };
    DetailPanel {
        title: "Timetable",
        fields: vec![
            ("Department", summary.dept_name.clone()),
            ("Program", format!("{} / {}", summary.program_name, summary.year_name)),
            ("Section", summary.section_name.clone()),
            (
                "Hours",
                format!(
                    "{} to {} every {} min, {:.0}% assigned",
                    format_clock(summary.start),
                    format_clock(summary.end),
                    summary.gap_minutes,
                    percent
                ),
            ),
        ],
        label_style: Style::default().fg(app.theme.secondary),
        border_style: Style::default().fg(app.theme.border),
    }
    .render(f, layout[0]);

    let mut header = vec![Cell::from("Day")];
    header.extend(grid.slots().iter().map(|slot| Cell::from(slot.label())));

    let rows: Vec<Row> = grid
        .days()
        .iter()
        .enumerate()
        .map(|(day_index, day)| {
            let mut cells = vec![Cell::from(day.to_string())];
            for slot_index in 0..grid.slots().len() {
                let Ok(cell) = grid.cell(day_index, slot_index) else { continue };
                let mut lines = Vec::new();
                if let Some(cid) = &cell.course {
                    lines.push(Line::from(grid_state.course_label(cid)));
                }
                if let Some(faculty) = cell.faculty_label() {
                    lines.push(Line::from(faculty.to_string()));
                }
                if let Some(rid) = &cell.room {
                    lines.push(Line::from(grid_state.room_label(rid)));
                }
                if lines.is_empty() {
                    lines.push(Line::from("-"));
                }
                let mut style = Style::default().fg(slot_color(cell, &app.theme));
                if day_index == grid_state.day && slot_index == grid_state.slot {
                    style = style.bg(app.theme.bg_highlight).add_modifier(Modifier::BOLD);
                }
                cells.push(Cell::from(Text::from(lines)).style(style));
            }
            Row::new(cells).height(3)
        })
        .collect();

    let mut widths = vec![Constraint::Length(DAY_WIDTH)];
    widths.extend(grid.slots().iter().map(|_| Constraint::Length(SLOT_WIDTH)));

    let table = Table::new(rows, widths)
        .header(
            Row::new(header).style(
                Style::default()
                    .fg(app.theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
        )
        .block(
            Block::default()
                .title("h/l slot • j/k day • c course • r room • x clear")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focus)),
        );
    f.render_widget(table, layout[1]);
}
