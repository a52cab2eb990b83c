use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState};

use crate::format::{format_kb, format_ticks, truncate_unicode};
use crate::system::record::ProcessRecord;
use crate::system::sorter::{SortColumn, SortSpec};
use crate::ui::theme::Theme;

const COMMAND_MIN_WIDTH: u16 = 20;

/// Table columns in display order, with the sort column each one drives.
const COLUMNS: [(&str, Option<SortColumn>, Constraint); 10] = [
    ("PID", Some(SortColumn::Pid), Constraint::Length(7)),
    ("USER", Some(SortColumn::User), Constraint::Length(9)),
    ("PROGRAM", None, Constraint::Length(16)),
    ("%CPU", Some(SortColumn::Cpu), Constraint::Length(6)),
    ("%MEM", Some(SortColumn::Memory), Constraint::Length(6)),
    ("VIRT", Some(SortColumn::VirtualSize), Constraint::Length(7)),
    ("RES", Some(SortColumn::ResidentSize), Constraint::Length(7)),
    ("S", None, Constraint::Length(1)),
    ("TIME+", Some(SortColumn::Time), Constraint::Length(9)),
    ("COMMAND", None, Constraint::Min(COMMAND_MIN_WIDTH)),
];

/// Number of body rows that fit in `area`.
pub fn visible_rows(area: Rect) -> usize {
    // Two border lines plus the column header.
    area.height.saturating_sub(3) as usize
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    rows: &[ProcessRecord],
    state: &mut TableState,
    sort: SortSpec,
    clock_ticks: u64,
    theme: &Theme,
) {
    let header = Row::new(COLUMNS.iter().map(|(title, column, _)| {
        let text = match column {
            Some(c) if *c == sort.column => format!("{title}{}", sort.arrow()),
            _ => (*title).to_string(),
        };
        Cell::from(text)
    }))
    .style(
        Style::default()
            .fg(theme.header_accent_fg)
            .bg(theme.column_header_bg)
            .add_modifier(Modifier::BOLD),
    );

    let command_width = area.width.saturating_sub(
        COLUMNS
            .iter()
            .map(|(_, _, c)| match c {
                Constraint::Length(n) => n + 1,
                _ => 0,
            })
            .sum::<u16>()
            + 2,
    );

    let body = rows
        .iter()
        .map(|record| row_for(record, clock_ticks, command_width.max(COMMAND_MIN_WIDTH), theme));

    let table = Table::new(body, COLUMNS.map(|(_, _, c)| c))
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.overlay_border)),
        )
        .row_highlight_style(
            Style::default()
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, state);
}

fn row_for<'a>(record: &'a ProcessRecord, clock_ticks: u64, command_width: u16, theme: &Theme) -> Row<'a> {
    let cpu = record.cpu_percent();
    let mem = record.mem_percent();
    let row = Row::new(vec![
        Cell::from(record.pid.to_string()),
        Cell::from(truncate_unicode(&record.owner_name, 9)),
        Cell::from(truncate_unicode(record.program(), 16)),
        Cell::from(Line::from(Span::styled(
            format!("{cpu:>5.1}"),
            Style::default().fg(theme.heat(cpu)),
        ))),
        Cell::from(Line::from(Span::styled(
            format!("{mem:>5.1}"),
            Style::default().fg(theme.heat(mem)),
        ))),
        Cell::from(format_kb(record.virtual_kb)),
        Cell::from(format_kb(record.resident_kb)),
        Cell::from(record.state.to_string()),
        Cell::from(format_ticks(record.cur_cpu_ticks, clock_ticks)),
        Cell::from(truncate_unicode(
            &record.display_command(),
            command_width as usize,
        )),
    ]);

    if record.alive {
        row.style(Style::default().fg(theme.text_primary))
    } else {
        row.style(
            Style::default()
                .fg(theme.text_dim)
                .add_modifier(Modifier::DIM | Modifier::CROSSED_OUT),
        )
    }
}
