/// Main TUI application
///
/// Each screen that shows live data owns a mounted view. Switching screens
/// or containers unmounts the old view before the new one is mounted, so a
/// late response for a previous subject can never reach the display.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::{mount_containers, ApiClient, ContainerId, ContainersView, StatsView, Subject};
use crate::screens::{Dashboard, DashboardView};
use crate::utils::AppConfig;

const EVENT_POLL: Duration = Duration::from_millis(100);

/// Wait up to `EVENT_POLL` for a key press, off the runtime threads
fn next_key() -> io::Result<Option<KeyEvent>> {
    if event::poll(EVENT_POLL)? {
        if let Event::Key(key_event) = event::read()? {
            return Ok(Some(key_event));
        }
    }
    Ok(None)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Containers,
    Stats,
    About,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Containers => "Containers",
            Screen::Stats => "Container Stats",
            Screen::About => "About",
        }
    }

    /// Screens reachable from the navbar
    pub fn tabs() -> &'static [Screen] {
        &[Screen::Containers, Screen::About]
    }

    /// Navbar tab highlighted while this screen is shown
    pub fn tab(&self) -> Screen {
        match self {
            Screen::Stats => Screen::Containers,
            other => *other,
        }
    }
}

pub struct App {
    dashboard: Dashboard,
    client: ApiClient,
    config: AppConfig,
    current_screen: Screen,
    containers_view: Option<ContainersView>,
    stats_view: Option<StatsView>,
    selected_index: usize,
    show_help: bool,
    status_message: Option<String>,
    tick: usize,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = ApiClient::new(config.api_config())?;

        Ok(Self {
            dashboard: Dashboard::new(client.base_url()),
            client,
            config,
            current_screen: Screen::Containers,
            containers_view: None,
            stats_view: None,
            selected_index: 0,
            show_help: false,
            status_message: None,
            tick: 0,
            should_quit: false,
        })
    }

    pub fn current_screen(&self) -> Screen {
        self.current_screen
    }

    pub fn containers_view(&self) -> Option<&ContainersView> {
        self.containers_view.as_ref()
    }

    pub fn stats_view(&self) -> Option<&StatsView> {
        self.stats_view.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Take over the terminal until the user quits. Works on any tokio runtime.
    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        info!(api = %self.client.base_url(), "dashboard started");
        self.set_screen(Screen::Containers);

        let result = self.run_loop(&mut terminal).await;

        self.unmount_all();

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn run_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.pump();

            terminal.draw(|f| self.render(f))?;

            let key = tokio::task::spawn_blocking(next_key).await??;

            if let Some(key_event) = key {
                self.handle_key(key_event);
            }

            self.tick = self.tick.wrapping_add(1);

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Apply queued poll results to the mounted views
    pub fn pump(&mut self) {
        if let Some(view) = self.containers_view.as_mut() {
            view.pump();
            let count = view.state().data().map(Vec::len).unwrap_or(0);
            self.selected_index = self.selected_index.min(count.saturating_sub(1));
        }
        if let Some(view) = self.stats_view.as_mut() {
            view.pump();
        }
    }

    /// Switch screens, mounting and unmounting views as needed
    pub fn set_screen(&mut self, screen: Screen) {
        if screen != Screen::Stats {
            self.unmount_stats();
        }

        match screen {
            Screen::Containers => {
                if self.containers_view.is_none() {
                    self.containers_view = Some(mount_containers(
                        &self.client,
                        self.config.containers_options(),
                        self.config.error_policy(),
                    ));
                }
            }
            Screen::Stats | Screen::About => self.unmount_containers(),
        }

        debug!(from = ?self.current_screen, to = ?screen, "screen change");
        self.current_screen = screen;
    }

    /// Show live stats for `id`; remounts only when the container changes
    pub fn open_stats(&mut self, id: ContainerId) {
        let subject = Subject::Container(id.clone());
        let already_bound = self
            .stats_view
            .as_ref()
            .map(|view| view.is_bound_to(&subject))
            .unwrap_or(false);

        if !already_bound {
            // Old view stops before the new one starts
            self.unmount_stats();
            self.stats_view = Some(StatsView::mount(
                &self.client,
                id,
                self.config.stats_options(),
                self.config.error_policy(),
            ));
        }

        self.set_screen(Screen::Stats);
    }

    fn unmount_containers(&mut self) {
        if let Some(mut view) = self.containers_view.take() {
            view.stop();
        }
    }

    fn unmount_stats(&mut self) {
        if let Some(mut view) = self.stats_view.take() {
            view.stop();
        }
    }

    fn unmount_all(&mut self) {
        self.unmount_containers();
        self.unmount_stats();
    }

    fn selected_container(&self) -> Option<ContainerId> {
        self.containers_view
            .as_ref()
            .and_then(|view| view.state().data())
            .and_then(|containers| containers.get(self.selected_index))
            .map(|container| container.id.clone())
    }

    fn container_count(&self) -> usize {
        self.containers_view
            .as_ref()
            .and_then(|view| view.state().data())
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn next_tab(&mut self) {
        let tabs = Screen::tabs();
        let current_idx = tabs.iter().position(|s| *s == self.current_screen.tab()).unwrap_or(0);
        let next_idx = (current_idx + 1) % tabs.len();
        self.set_screen(tabs[next_idx]);
    }

    pub fn handle_key(&mut self, key_event: KeyEvent) {
        let key = key_event.code;

        if key == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Clear status message on any key
        self.clear_status();

        if self.show_help {
            if matches!(key, KeyCode::Esc | KeyCode::Char('?') | KeyCode::F(1)) {
                self.show_help = false;
            } else if key == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return;
        }

        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = true,
            KeyCode::Tab => self.next_tab(),
            KeyCode::Char('1') => self.set_screen(Screen::Containers),
            KeyCode::Char('2') => self.set_screen(Screen::About),
            _ => match self.current_screen {
                Screen::Containers => self.handle_containers_key(key),
                Screen::Stats => self.handle_stats_key(key),
                Screen::About => {}
            },
        }
    }

    fn handle_containers_key(&mut self, key: KeyCode) {
        let count = self.container_count();

        match key {
            KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => {
                if self.selected_index + 1 < count {
                    self.selected_index += 1;
                }
            }
            KeyCode::Enter => match self.selected_container() {
                Some(id) => self.open_stats(id),
                None => self.set_status("No container selected".to_string()),
            },
            _ => {}
        }
    }

    fn handle_stats_key(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b')) {
            self.set_screen(Screen::Containers);
        }
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        let view = DashboardView {
            screen: self.current_screen,
            containers: self.containers_view.as_ref().map(|v| v.state()),
            stats: self.stats_view.as_ref(),
            selected_index: self.selected_index,
            show_help: self.show_help,
            status_message: self.status_message.as_deref(),
            tick: self.tick,
        };
        self.dashboard.render(frame, &view);
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.unmount_all();
    }
}
