/// Main dashboard frame

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::Screen;
use crate::core::{ContainerSummary, StatsView, ViewState};
use crate::screens::{about, containers, stats};
use crate::utils::APP_TITLE;
use crate::widgets;

/// Everything one frame needs, borrowed from the app
pub struct DashboardView<'a> {
    pub screen: Screen,
    pub containers: Option<&'a ViewState<Vec<ContainerSummary>>>,
    pub stats: Option<&'a StatsView>,
    pub selected_index: usize,
    pub show_help: bool,
    pub status_message: Option<&'a str>,
    pub tick: usize,
}

pub struct Dashboard {
    title: String,
    api_url: String,
}

impl Dashboard {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            title: APP_TITLE.to_string(),
            api_url: api_url.into(),
        }
    }

    pub fn render(&self, frame: &mut Frame, view: &DashboardView) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Navbar
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Footer
            ])
            .split(frame.size());

        frame.render_widget(self.render_navbar(view.screen), chunks[0]);

        let content = Block::default().borders(Borders::ALL);
        let content_area = content.inner(chunks[1]);
        frame.render_widget(content, chunks[1]);

        match view.screen {
            Screen::Containers => match view.containers {
                Some(state) => containers::render(frame, content_area, state, view.selected_index, view.tick),
                None => widgets::render_loader(frame, content_area, view.tick),
            },
            Screen::Stats => match view.stats {
                Some(stats_view) => stats::render(frame, content_area, stats_view, view.tick),
                None => widgets::render_loader(frame, content_area, view.tick),
            },
            Screen::About => about::render(frame, content_area),
        }

        let footer_text = match view.status_message {
            Some(status) => status.to_string(),
            None => Self::key_hints(view.screen).to_string(),
        };

        let footer = Paragraph::new(footer_text)
            .alignment(Alignment::Center)
            .style(if view.status_message.is_some() {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            })
            .block(Block::default().borders(Borders::ALL));

        frame.render_widget(footer, chunks[2]);

        if view.show_help {
            self.render_help(frame, view.screen);
        }
    }

    pub fn key_hints(screen: Screen) -> &'static str {
        match screen {
            Screen::Containers => "[Tab] Next tab | [↑↓←→] Select | [Enter] View stats | [?] Help | [q]uit",
            Screen::Stats => "[Esc/b] Back to containers | [Tab] Next tab | [?] Help | [q]uit",
            Screen::About => "[Tab] Next tab | [1-2] Jump to tab | [?] Help | [q]uit",
        }
    }

    fn render_navbar(&self, current_screen: Screen) -> Paragraph<'_> {
        let active_tab = current_screen.tab();

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
        ];

        for (i, tab) in Screen::tabs().iter().enumerate() {
            let style = if *tab == active_tab {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(format!(" [{}] {} ", i + 1, tab.title()), style));
            spans.push(Span::raw("  "));
        }

        spans.push(Span::styled(
            format!("  {}", self.api_url),
            Style::default().fg(Color::DarkGray),
        ));

        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL))
    }

    fn render_help(&self, frame: &mut Frame, current_screen: Screen) {
        let popup_area = widgets::centered_rect(frame.size(), 70, 20);

        let mut help_text = vec![
            Line::from(Span::styled(
                format!("{} - Keyboard Shortcuts", self.title),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Global:", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))),
            Line::from("  [Tab]          Next tab (Containers ↔ About)"),
            Line::from("  [1-2]          Jump to tab"),
            Line::from("  [?] / [F1]     Toggle this help screen"),
            Line::from("  [q] / [Ctrl-C] Quit application"),
            Line::from(""),
        ];

        match current_screen {
            Screen::Containers => {
                help_text.push(Line::from(Span::styled("Containers:", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))));
                help_text.push(Line::from("  [↑↓←→] / [j/k]  Select container"));
                help_text.push(Line::from("  [Enter]         Open live stats"));
            }
            Screen::Stats => {
                help_text.push(Line::from(Span::styled("Container Stats:", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))));
                help_text.push(Line::from("  [Esc] / [Backspace] / [b]  Back to containers"));
                help_text.push(Line::from("  Metrics refresh automatically; charts keep the latest samples"));
            }
            Screen::About => {}
        }

        help_text.push(Line::from(""));
        help_text.push(Line::from(Span::styled(
            "Press [?] or [Esc] to close this help",
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )));

        frame.render_widget(Clear, popup_area);

        let help_widget = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(Span::styled(" Help ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))),
            )
            .wrap(Wrap { trim: true });

        frame.render_widget(help_widget, popup_area);
    }
}
