use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::app::{PendingAction, SettingsDraft, SettingsField};
use crate::ui::help::centered_rect;
use crate::ui::theme::Theme;

pub fn render_confirm(frame: &mut Frame, area: Rect, pending: &PendingAction, theme: &Theme) {
    let prompt = pending.prompt();
    let width = (prompt.chars().count() as u16 + 6)
        .max(30)
        .min(area.width.saturating_sub(4));
    let overlay = centered_rect(width, 5, area);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.status_err))
        .title(Span::styled(
            " Confirm ",
            Style::default().fg(theme.status_err).add_modifier(Modifier::BOLD),
        ));
    let lines = vec![
        Line::from(Span::styled(prompt, Style::default().fg(theme.text_primary))),
        Line::from(""),
        Line::from(Span::styled("[y] yes   [n] no", Style::default().fg(theme.text_secondary))),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(theme.surface_bg)),
        overlay,
    );
}

pub fn render_settings(frame: &mut Frame, area: Rect, draft: &SettingsDraft, theme: &Theme) {
    let overlay = centered_rect(
        46u16.min(area.width.saturating_sub(4)),
        (SettingsField::ALL.len() as u16 + 4).min(area.height.saturating_sub(2)),
        area,
    );
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Alert settings ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));

    let focused = draft.field();
    let mut lines: Vec<Line> = SettingsField::ALL
        .iter()
        .map(|&field| {
            let marker = if field == focused { "\u{25b8} " } else { "  " };
            let style = if field == focused {
                Style::default()
                    .fg(theme.pill_key_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_primary)
            };
            Line::from(vec![
                Span::styled(format!("{marker}{:<24}", field.label()), style),
                Span::styled(draft.value_text(field), style),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{} webhook(s) configured", draft.alerts.webhooks.len()),
        Style::default().fg(theme.text_secondary),
    )));

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(Style::default().bg(theme.surface_bg)),
        overlay,
    );
}
