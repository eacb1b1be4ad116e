/// Stats screen: live metrics of one container
///
/// Stat tiles show the latest payload; the two charts plot the sample
/// window. A first failure with no data shows only the error panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use std::time::Duration;

use crate::core::{ContainerId, ContainerStats, SampleWindow, StatsView, ViewState};
use crate::utils::{format_bytes, format_interval, format_percent};
use crate::widgets;

const CPU_COLOR: Color = Color::Cyan;
const MEMORY_COLOR: Color = Color::Magenta;

/// Heading: the payload's id, or the requested one when the backend omits it
pub fn title(data: Option<&ContainerStats>, requested: &ContainerId) -> String {
    match data {
        Some(stats) if !stats.container_id.is_empty() => stats.container_id.clone(),
        _ => requested.to_string(),
    }
}

pub fn subtitle(interval: Duration) -> String {
    format!("Real-time container metrics (updates every {})", format_interval(interval))
}

/// X axis labels: first, middle and last sample times
pub fn time_labels(window: &SampleWindow) -> Vec<String> {
    let samples = window.to_sequence();
    match samples.len() {
        0 => Vec::new(),
        1 => vec![samples[0].time_label()],
        2 => vec![samples[0].time_label(), samples[1].time_label()],
        n => vec![
            samples[0].time_label(),
            samples[n / 2].time_label(),
            samples[n - 1].time_label(),
        ],
    }
}

pub fn render(frame: &mut Frame, area: Rect, view: &StatsView, tick: usize) {
    let screen = StatsScreen {
        requested: view.container_id(),
        interval: view.interval(),
        state: view.state(),
        window: view.window(),
    };
    screen.render(frame, area, tick);
}

/// Everything the stats screen draws, borrowed from a mounted view
struct StatsScreen<'a> {
    requested: &'a ContainerId,
    interval: Duration,
    state: &'a ViewState<ContainerStats>,
    window: &'a SampleWindow,
}

impl StatsScreen<'_> {
    fn render(&self, frame: &mut Frame, area: Rect, tick: usize) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let heading = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("← ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    title(self.state.data(), self.requested),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(subtitle(self.interval), Style::default().fg(Color::Gray))),
        ]);
        frame.render_widget(heading, chunks[0]);

        let state = self.state;
        let body = chunks[1];

        let stats = match state.data() {
            Some(stats) => stats,
            None if state.is_error() => {
                widgets::render_error_panel(frame, body, state.error_message().unwrap_or_default(), state.error_detail());
                return;
            }
            None => {
                widgets::render_loader(frame, body, tick);
                return;
            }
        };

        let banner_height = if state.is_error() { 1 } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(banner_height),
                Constraint::Length(5),
                Constraint::Min(0),
            ])
            .split(body);

        if let Some(message) = state.error_message() {
            widgets::render_error_banner(frame, rows[0], message);
        }

        render_tiles(frame, rows[1], stats);
        render_charts(frame, rows[2], self.window);
    }
}

fn render_tiles(frame: &mut Frame, area: Rect, stats: &ContainerStats) {
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let memory_detail = format!(
        "{} / {}",
        format_bytes(stats.memory_usage_bytes()),
        format_bytes(stats.memory_limit_bytes())
    );

    widgets::render_stat_card(frame, tiles[0], "CPU Usage", &format_percent(stats.cpu_percent), None, CPU_COLOR);
    widgets::render_stat_card(
        frame,
        tiles[1],
        "Memory Usage",
        &format_percent(stats.memory_percent),
        Some(&memory_detail),
        MEMORY_COLOR,
    );
    widgets::render_stat_card(
        frame,
        tiles[2],
        "Memory (MB)",
        &format_bytes(stats.memory_usage_bytes()),
        None,
        MEMORY_COLOR,
    );
}

fn render_charts(frame: &mut Frame, area: Rect, window: &SampleWindow) {
    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let labels = time_labels(window);
    let cpu = window.cpu_points();
    let memory = window.memory_points();

    render_chart(frame, charts[0], "CPU Usage Over Time", "CPU %", &cpu, &labels, window.capacity(), CPU_COLOR);
    render_chart(
        frame,
        charts[1],
        "Memory Usage Over Time",
        "Memory %",
        &memory,
        &labels,
        window.capacity(),
        MEMORY_COLOR,
    );
}

#[allow(clippy::too_many_arguments)]
fn render_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    series: &str,
    points: &[(f64, f64)],
    labels: &[String],
    capacity: usize,
    color: Color,
) {
    // Fixed width once the window is full, grows until then
    let x_max = points.len().min(capacity).saturating_sub(1).max(1) as f64;

    let dataset = Dataset::default()
        .name(series.to_string())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(points);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(
                    format!(" {} ", title),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_max])
                .labels(labels.iter().map(|l| Span::raw(l.clone())).collect()),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, 100.0])
                .labels(vec![Span::raw("0"), Span::raw("50"), Span::raw("100")]),
        );

    frame.render_widget(chart, area);
}
