//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize)
//! - LookupController for all lookup, animation, and audio behaviour
//! - ToastStack for notifications raised by the controller
//!
//! The App never decides anything about lookups. It forwards keystrokes to
//! the controller, feeds it elapsed time, and draws its snapshot.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use tokio::sync::{mpsc, oneshot};

use dex_core::{
    AudioPlayer, ChannelSink, CommandPlayer, DexConfig, LoadOutcome, LookupController,
    Notification, PokeApiClient, Severity, SilentPlayer,
};

use crate::theme::{DEX_RED, DIM_GRAY, INPUT_GREEN};
use crate::toast::ToastStack;
use crate::widgets::{SpritePanel, ToastList};

/// Input box height (lines, including borders)
const INPUT_HEIGHT: u16 = 3;

/// Notification channel capacity
const NOTIFICATION_CAPACITY: usize = 32;

/// Target frame duration (~10 FPS; the sprite only changes once a second)
const FRAME_DURATION: Duration = Duration::from_millis(100);

/// Longest wait for terminal input within one frame
const FRAME_POLL: Duration = Duration::from_millis(16);

type Controller = LookupController<PokeApiClient, ChannelSink, Box<dyn AudioPlayer>>;

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// The headless controller
    controller: Controller,
    /// Notifications raised by the controller
    notifications: mpsc::Receiver<Notification>,
    /// Client used for the startup reachability probe
    probe_client: Option<PokeApiClient>,
    /// Result of the startup reachability probe
    probe_rx: Option<oneshot::Receiver<bool>>,

    // === UI State ===
    /// Visible toasts
    toasts: ToastStack,
    /// Raw text in the input box
    input_buffer: String,
    /// Query to submit once at startup
    initial_query: Option<String>,

    // === Misc State ===
    /// Last frame time (for animations)
    last_frame: Instant,
    /// Spinner position while loading
    spinner_frame: usize,
}

impl App {
    /// Create a new App from resolved configuration
    ///
    /// # Errors
    ///
    /// Fails if the data service client cannot be built from `config`.
    pub fn new(config: &DexConfig, initial_query: Option<String>) -> anyhow::Result<Self> {
        let client = PokeApiClient::new(&config.api_url, config.api_timeout)?;
        let (sink, notifications) = ChannelSink::new(NOTIFICATION_CAPACITY);

        let player: Box<dyn AudioPlayer> = if config.audio_enabled {
            match CommandPlayer::new(&config.audio_command) {
                Some(player) => Box::new(player),
                None => {
                    tracing::warn!("Audio command is empty, cries are muted");
                    Box::new(SilentPlayer)
                }
            }
        } else {
            Box::new(SilentPlayer)
        };

        let probe_client = Some(client.clone());
        let controller = LookupController::new(client, sink, player, config.lookup_config());

        Ok(Self {
            running: true,
            controller,
            notifications,
            probe_client,
            probe_rx: None,
            toasts: ToastStack::new(),
            input_buffer: String::new(),
            initial_query,
            last_frame: Instant::now(),
            spinner_frame: 0,
        })
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        self.start_probe();

        if let Some(query) = self.initial_query.take() {
            self.set_input(query);
            self.submit();
        }

        self.render(terminal)?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        // Only handle Press events (not Release or Repeat)
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key);
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "Terminal event error");
                        }
                        None => self.running = false,
                    }
                }

                _ = tokio::time::sleep(FRAME_POLL) => {}
            }

            self.tick();
            self.render(terminal)?;

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < FRAME_DURATION {
                tokio::time::sleep(FRAME_DURATION - elapsed).await;
            }
        }

        self.controller.dispose();
        Ok(())
    }

    /// Check in the background that the data service answers
    fn start_probe(&mut self) {
        let Some(client) = self.probe_client.take() else {
            return;
        };
        let (tx, rx) = oneshot::channel();
        self.probe_rx = Some(rx);

        tokio::spawn(async move {
            let reachable = client.health_check().await;
            let _ = tx.send(reachable);
        });
    }

    fn check_probe(&mut self, now: Instant) {
        let Some(rx) = self.probe_rx.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(true) => self.probe_rx = None,
            Ok(false) => {
                self.probe_rx = None;
                self.toasts.push(
                    Notification::new(
                        Severity::Info,
                        "Offline",
                        "The data service is not answering, lookups may fail",
                    ),
                    now,
                );
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => self.probe_rx = None,
        }
    }

    /// Apply completions, notifications, and elapsed time
    fn tick(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;

        self.controller.poll();
        self.process_notifications(now);
        self.check_probe(now);
        self.controller.update(delta);
        self.toasts.expire(now);

        if self.controller.is_loading() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    /// Move pending notifications onto the toast stack
    fn process_notifications(&mut self, now: Instant) {
        while let Ok(notification) = self.notifications.try_recv() {
            self.toasts.push(notification, now);
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            // Clear input
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.set_input(String::new());
            }

            // Dismiss newest toast
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.toasts.dismiss_latest();
            }

            // Submit lookup
            KeyCode::Enter => self.submit(),

            // Typing
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input_buffer.push(c);
                self.controller.update_name(&self.input_buffer);
            }

            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.controller.update_name(&self.input_buffer);
            }

            _ => {}
        }
    }

    fn set_input(&mut self, text: String) {
        self.input_buffer = text;
        self.controller.update_name(&self.input_buffer);
    }

    fn submit(&mut self) {
        if let LoadOutcome::Requested { generation } = self.controller.load() {
            tracing::debug!(generation, "Lookup submitted");
            self.spinner_frame = 0;
        }
    }

    /// Render the UI
    fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let [panel_area, input_area, status_area] = Layout::vertical([
            Constraint::Min(5),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let snapshot = self.controller.snapshot();
        frame.render_widget(
            SpritePanel::new(&snapshot).spinner_frame(self.spinner_frame),
            panel_area,
        );

        let input = Paragraph::new(Line::from(vec![
            Span::styled(self.input_buffer.as_str(), Style::default().fg(INPUT_GREEN)),
            Span::styled("_", Style::default().fg(DIM_GRAY)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(DEX_RED))
                .title(" Name or ID "),
        );
        frame.render_widget(input, input_area);

        let state = if snapshot.loading {
            "loading"
        } else if snapshot.animating {
            "animating"
        } else {
            "idle"
        };
        let status = format!(" {state} | Enter look up | Ctrl-U clear | Ctrl-D dismiss | Esc quit");
        frame.render_widget(
            Paragraph::new(status).style(Style::default().fg(DIM_GRAY)),
            status_area,
        );

        frame.render_widget(ToastList::new(&self.toasts), panel_area);
    }
}
