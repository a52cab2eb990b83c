use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::InputMode;
use crate::system::sorter::SortSpec;
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    input_mode: &InputMode,
    filter_text: &str,
    status_message: Option<&(String, std::time::Instant)>,
    sort: SortSpec,
    theme: &Theme,
) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    // Status message takes priority
    if let Some((msg, _)) = status_message {
        let failed = msg.starts_with("Failed") || msg.starts_with("Could not") || msg.contains("not found");
        let color = if failed { theme.status_err } else { theme.status_ok };
        let line = Line::from(Span::styled(
            format!(" {msg}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).style(bg_style), area);
        return;
    }

    let line = match input_mode {
        InputMode::Filter => {
            let mut spans = vec![
                Span::styled(
                    " / ",
                    Style::default()
                        .fg(theme.pill_key_fg)
                        .bg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {filter_text}"), Style::default().fg(theme.pill_desc_fg)),
                Span::styled("\u{2588}", Style::default().fg(theme.pill_key_bg)),
            ];
            spans.extend(pill_spans("Esc", "Cancel", theme));
            spans.extend(pill_spans("Enter", "Apply", theme));
            Line::from(spans)
        }
        InputMode::Confirm(_) => {
            let mut spans = Vec::new();
            spans.extend(pill_spans("y", "Confirm", theme));
            spans.extend(pill_spans("n", "Cancel", theme));
            Line::from(spans)
        }
        InputMode::Settings => {
            let mut spans = Vec::new();
            spans.extend(pill_spans("\u{2191}\u{2193}", "Field", theme));
            spans.extend(pill_spans("\u{2190}\u{2192}", "Change", theme));
            spans.extend(pill_spans("Enter", "Save", theme));
            spans.extend(pill_spans("Esc", "Discard", theme));
            Line::from(spans)
        }
        InputMode::Normal | InputMode::Help => {
            let mut spans = Vec::new();
            if !filter_text.is_empty() {
                spans.push(Span::styled(
                    " Filter: ",
                    Style::default()
                        .fg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::styled(filter_text, Style::default().fg(theme.pill_desc_fg)));
            }
            spans.extend(pill_spans("q", "Quit", theme));
            spans.extend(pill_spans("/", "Filter", theme));
            spans.extend(pill_spans("k", "Term", theme));
            spans.extend(pill_spans("K", "Kill", theme));
            spans.extend(pill_spans("n/N", "Nice", theme));
            spans.extend(pill_spans("s", "Settings", theme));
            spans.extend(pill_spans("?", "Help", theme));
            spans.push(Span::styled(
                format!("  Sort: {}{}", sort.column.label(), sort.arrow()),
                Style::default().fg(theme.pill_desc_fg),
            ));
            Line::from(spans)
        }
    };

    frame.render_widget(Paragraph::new(line).style(bg_style), area);
}

fn pill_spans<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {desc}"),
            Style::default().fg(theme.pill_desc_fg).bg(theme.surface_bg),
        ),
    ]
}
