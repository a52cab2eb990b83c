use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::format::{format_kb, format_uptime};
use crate::system::snapshot::Frame as SampleFrame;
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, sample: Option<&SampleFrame>, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let brand = Span::styled(
        " sentinel ",
        Style::default()
            .fg(theme.header_accent_fg)
            .bg(theme.header_accent_bg)
            .add_modifier(Modifier::BOLD),
    );

    let Some(sample) = sample else {
        let line = Line::from(vec![
            brand,
            Span::styled("  sampling...", Style::default().fg(theme.text_secondary)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
        return;
    };

    let system = &sample.system;
    let [l1, l5, l15] = system.load_average;
    let label = Style::default().fg(theme.text_secondary);
    let value = Style::default()
        .fg(theme.text_primary)
        .add_modifier(Modifier::BOLD);

    let line = Line::from(vec![
        brand,
        Span::styled("  Tasks: ", label),
        Span::styled(sample.total_observed.to_string(), value),
        Span::styled(", ", label),
        Span::styled(sample.total_running.to_string(), value),
        Span::styled(" running", label),
        Span::styled("  Load: ", label),
        Span::styled(format!("{l1:.2} {l5:.2} {l15:.2}"), value),
        Span::styled("  Uptime: ", label),
        Span::styled(format_uptime(system.uptime_seconds), value),
        Span::styled("  Mem: ", label),
        Span::styled(format_kb(system.total_memory_kb), value),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
