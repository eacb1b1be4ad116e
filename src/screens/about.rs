/// About screen

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::utils::{APP_TITLE, FEATURES};

const OVERVIEW: &str = "A terminal dashboard for Docker containers. It polls the monitoring \
backend on a fixed cadence and shows the container inventory and live CPU and memory \
metrics, so operators can keep an eye on system health without leaving the shell.";

pub fn render(frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(6), // Overview
            Constraint::Min(0),    // Features
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        format!("About {}", APP_TITLE),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let overview = Paragraph::new(OVERVIEW)
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Overview "));
    frame.render_widget(overview, chunks[1]);

    let mut lines = Vec::new();
    for (name, description) in FEATURES {
        lines.push(Line::from(Span::styled(
            format!("▸ {}", name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", description),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(""));
    }

    let features = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Features "));
    frame.render_widget(features, chunks[2]);
}
