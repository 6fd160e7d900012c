use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{
    Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, LegendPosition,
};

use crate::system::snapshot::{ChartSnapshot, Series};
use crate::ui::theme::Theme;

/// One multi-line chart, one dataset per core.
pub fn render_cpu(
    frame: &mut Frame,
    area: Rect,
    snapshot: &ChartSnapshot,
    theme: &Theme,
    show_legend: bool,
) {
    let points: Vec<Vec<(f64, f64)>> = snapshot.cores.iter().map(to_points).collect();
    let datasets = snapshot
        .cores
        .iter()
        .zip(&points)
        .enumerate()
        .map(|(i, (series, data))| {
            Dataset::default()
                .name(format!("{} {:>3.0}%", series.label, series.latest()))
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme.core_color(i)))
                .data(data)
        })
        .collect();

    let title = format!(
        " CPU {} cores avg {:.0}% ",
        snapshot.cores.len(),
        average_latest(&snapshot.cores)
    );
    let chart = Chart::new(datasets)
        .block(chart_block(title, theme))
        .x_axis(x_axis(snapshot.width(), theme))
        .y_axis(y_axis(theme))
        .legend_position(show_legend.then_some(LegendPosition::TopLeft))
        .hidden_legend_constraints((Constraint::Percentage(40), Constraint::Percentage(60)));

    frame.render_widget(chart, area);
}

pub fn render_memory(frame: &mut Frame, area: Rect, snapshot: &ChartSnapshot, theme: &Theme) {
    let data = to_points(&snapshot.memory);
    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme.memory_line))
        .data(&data);

    let title = format!(" Memory {:.0}% ", snapshot.memory.latest());
    let chart = Chart::new(vec![dataset])
        .block(chart_block(title, theme))
        .x_axis(x_axis(snapshot.width(), theme))
        .y_axis(y_axis(theme))
        .legend_position(None);

    frame.render_widget(chart, area);
}

fn to_points(series: &Series) -> Vec<(f64, f64)> {
    series
        .values
        .iter()
        .enumerate()
        .map(|(x, y)| (x as f64, *y))
        .collect()
}

fn average_latest(cores: &[Series]) -> f64 {
    if cores.is_empty() {
        return 0.0;
    }
    cores.iter().map(Series::latest).sum::<f64>() / cores.len() as f64
}

fn chart_block(title: String, theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ))
}

fn x_axis(width: usize, theme: &Theme) -> Axis<'static> {
    // a single point still needs a non-empty range
    let right = width.saturating_sub(1).max(1) as f64;
    Axis::default()
        .style(Style::default().fg(theme.axis))
        .bounds([0.0, right])
}

fn y_axis(theme: &Theme) -> Axis<'static> {
    Axis::default()
        .style(Style::default().fg(theme.axis))
        .bounds([0.0, 100.0])
        .labels(["0", "50", "100"])
}
