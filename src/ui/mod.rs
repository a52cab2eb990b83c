pub mod dialog;
pub mod header;
pub mod help;
pub mod statusbar;
pub mod table;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{App, InputMode};
use crate::ui::theme::Theme;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let theme = Theme::default();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(frame, chunks[0], app.frame.as_ref(), &theme);

    app.page_size = table::visible_rows(chunks[1]);
    table::render(
        frame,
        chunks[1],
        &app.rows,
        &mut app.table_state,
        app.sort,
        app.clock_ticks,
        &theme,
    );

    statusbar::render(
        frame,
        chunks[2],
        &app.input_mode,
        &app.filter_text,
        app.status_message.as_ref(),
        app.sort,
        &theme,
    );

    // Overlays last so they sit on top
    match &app.input_mode {
        InputMode::Help => help::render(frame, frame.area(), &theme),
        InputMode::Confirm(pending) => dialog::render_confirm(frame, frame.area(), pending, &theme),
        InputMode::Settings => {
            if let Some(draft) = &app.settings {
                dialog::render_settings(frame, frame.area(), draft, &theme);
            }
        }
        InputMode::Normal | InputMode::Filter => {}
    }
}
