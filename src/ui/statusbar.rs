use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::system::snapshot::ChartSnapshot;
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    snapshot: &ChartSnapshot,
    show_legend: bool,
    theme: &Theme,
) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    let mut spans = Vec::new();
    spans.extend(pill_spans("q", "Quit", theme));
    spans.extend(pill_spans(
        "l",
        if show_legend { "Hide legend" } else { "Legend" },
        theme,
    ));
    spans.push(Span::styled(
        format!("  round {}", snapshot.round),
        Style::default().fg(theme.pill_desc_fg),
    ));

    // Failed round takes the rest of the line
    if let Some(err) = &snapshot.last_error {
        spans.push(Span::styled(
            format!(
                "  sample failed ({}x): {err}",
                snapshot.consecutive_failures
            ),
            Style::default()
                .fg(theme.status_err)
                .add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
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
