use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::ui::theme::Theme;

pub const ENTRIES: [(&str, &str); 17] = [
    ("\u{2191}\u{2193}", "Move selection"),
    ("PgUp/PgDn", "Move one page"),
    ("Home/End", "First / last row"),
    ("c", "Sort by CPU"),
    ("m", "Sort by memory"),
    ("p", "Sort by PID"),
    ("u", "Sort by user"),
    ("v", "Sort by virtual size"),
    ("r", "Sort by resident size"),
    ("t", "Sort by CPU time"),
    ("/", "Filter processes"),
    ("k", "Terminate (SIGTERM)"),
    ("K", "Force kill (SIGKILL)"),
    ("n / N", "Nice -5 / +5"),
    ("s", "Alert settings"),
    ("?", "Toggle help"),
    ("q, Ctrl+C", "Quit"),
];

/// Centered overlay listing every key binding.
pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
    let width = 44u16.min(area.width.saturating_sub(4));
    let height = (ENTRIES.len() as u16 + 2).min(area.height.saturating_sub(2));
    let overlay = centered_rect(width, height, area);

    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Keybinds ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(overlay);

    let lines: Vec<Line> = ENTRIES
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(
                    format!(" {key:>10} "),
                    Style::default()
                        .fg(theme.pill_key_fg)
                        .bg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {desc}"), Style::default().fg(theme.pill_desc_fg)),
            ])
        })
        .collect();

    frame.render_widget(block, overlay);
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(theme.surface_bg)),
        inner,
    );
}

pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [vert] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [horiz] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(vert);
    horiz
}
