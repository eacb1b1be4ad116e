/// Containers screen: inventory as a grid of cards

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::core::{ContainerSummary, ViewState};
use crate::utils::{truncate_string, NO_CONTAINERS_MESSAGE, NO_CONTAINERS_TITLE};
use crate::widgets;

const CARD_HEIGHT: u16 = 6;

/// "1 container available" / "3 containers available"
pub fn count_label(count: usize) -> String {
    let noun = if count == 1 { "container" } else { "containers" };
    format!("{} {} available", count, noun)
}

/// Number of card columns that fit in `width`
pub fn grid_columns(width: u16) -> usize {
    match width {
        w if w >= 120 => 3,
        w if w >= 80 => 2,
        _ => 1,
    }
}

/// First grid row to draw so that `selected_row` stays visible
pub fn first_visible_row(selected_row: usize, visible_rows: usize) -> usize {
    selected_row.saturating_sub(visible_rows.saturating_sub(1))
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState<Vec<ContainerSummary>>, selected_index: usize, tick: usize) {
    let containers = match state.data() {
        Some(containers) => containers,
        None if state.is_error() => {
            widgets::render_error_panel(frame, area, state.error_message().unwrap_or_default(), state.error_detail());
            return;
        }
        None => {
            widgets::render_loader(frame, area, tick);
            return;
        }
    };

    let banner_height = if state.is_error() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),             // Header
            Constraint::Length(banner_height), // Stale data banner
            Constraint::Min(0),                // Grid
        ])
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "Docker Containers",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(count_label(containers.len()), Style::default().fg(Color::Gray))),
    ]);
    frame.render_widget(header, chunks[0]);

    if let Some(message) = state.error_message() {
        widgets::render_error_banner(frame, chunks[1], message);
    }

    if containers.is_empty() {
        render_empty(frame, chunks[2]);
        return;
    }

    render_grid(frame, chunks[2], containers, selected_index);
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let notice = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            NO_CONTAINERS_TITLE,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(NO_CONTAINERS_MESSAGE, Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));

    frame.render_widget(notice, widgets::centered_rect(area, 60, 7));
}

fn render_grid(frame: &mut Frame, area: Rect, containers: &[ContainerSummary], selected_index: usize) {
    let columns = grid_columns(area.width);
    let visible_rows = ((area.height / CARD_HEIGHT) as usize).max(1);
    let selected_row = selected_index / columns;
    let first_row = first_visible_row(selected_row, visible_rows);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(area);

    for (row_offset, row_area) in row_areas.iter().enumerate() {
        let row = first_row + row_offset;
        let col_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row_area);

        for (col, card_area) in col_areas.iter().enumerate() {
            let index = row * columns + col;
            if let Some(container) = containers.get(index) {
                render_card(frame, *card_area, container, index == selected_index);
            }
        }
    }
}

fn render_card(frame: &mut Frame, area: Rect, container: &ContainerSummary, selected: bool) {
    let width = area.width.saturating_sub(4) as usize;

    let mut lines = vec![
        Line::from(Span::styled(
            truncate_string(&container.name, width),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate_string(&container.image, width),
            Style::default().fg(Color::Gray),
        )),
        Line::from(vec![
            Span::styled("Status: ", Style::default().fg(Color::DarkGray)),
            widgets::status_badge(&container.status),
        ]),
    ];

    if selected {
        lines.push(Line::from(Span::styled(
            "[Enter] View Stats",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
    }

    let border_style = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(
                format!(" {} ", container.id.short()),
                Style::default().fg(Color::DarkGray),
            )),
    );
    frame.render_widget(card, area);
}
