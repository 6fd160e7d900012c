pub mod charts;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let snapshot = app.snapshot.as_ref();
    charts::render_cpu(frame, chunks[0], snapshot, &app.theme, app.show_legend);
    charts::render_memory(frame, chunks[1], snapshot, &app.theme);
    statusbar::render(frame, chunks[2], snapshot, app.show_legend, &app.theme);
}
