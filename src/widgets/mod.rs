/// Small reusable pieces drawn with ratatui primitives: stat tiles, the
/// loading spinner, error panels and status badges.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::utils::{ContainerState, StatusTone};

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn tone_color(tone: StatusTone) -> Color {
    match tone {
        StatusTone::Success => Color::Green,
        StatusTone::Destructive => Color::Red,
        StatusTone::Muted => Color::Gray,
    }
}

/// "● running" coloured by state; shows the raw backend status text
pub fn status_badge(status: &str) -> Span<'static> {
    let color = tone_color(ContainerState::from(status).tone());
    Span::styled(
        format!("● {}", status),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

/// Centered popup area inside `area`
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = area.width.min(width);
    let height = area.height.min(height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

pub fn render_stat_card(frame: &mut Frame, area: Rect, label: &str, value: &str, sub_value: Option<&str>, accent: Color) {
    let mut lines = vec![
        Line::from(Span::styled(label.to_string(), Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(sub) = sub_value {
        lines.push(Line::from(Span::styled(sub.to_string(), Style::default().fg(Color::DarkGray))));
    }

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent)),
    );
    frame.render_widget(card, area);
}

pub fn render_loader(frame: &mut Frame, area: Rect, tick: usize) {
    let spinner = SPINNER_FRAMES[tick % SPINNER_FRAMES.len()];
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);

    let loader = Paragraph::new(vec![
        Line::from(Span::styled(spinner, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))),
        Line::from(Span::styled("Loading...", Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center);

    frame.render_widget(loader, chunks[1]);
}

/// Full error panel shown when there is nothing else to display
pub fn render_error_panel(frame: &mut Frame, area: Rect, message: &str, detail: Option<&str>) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(detail) = detail {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(detail.to_string(), Style::default().fg(Color::DarkGray))));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Retrying automatically...",
        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
    )));

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(Span::styled(" Error ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))),
        );
    frame.render_widget(panel, area);
}

/// One-line banner above stale data
pub fn render_error_banner(frame: &mut Frame, area: Rect, message: &str) {
    let banner = Paragraph::new(Line::from(vec![
        Span::styled(" ⚠ ", Style::default().fg(Color::Black).bg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(message.to_string(), Style::default().fg(Color::Red)),
        Span::styled("  (showing last known data)", Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(banner, area);
}
