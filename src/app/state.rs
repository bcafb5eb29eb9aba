//! Application state management

use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use super::config::Config;
use super::events::{AppEvent, EventHandler};
use crate::backend::BackendClient;
use crate::scan::{RunState, ScanBoard, ScanKind, ScanPayload, SUCCESS_MESSAGE};
use crate::tui::widgets::TextInputState;
use crate::tui::Tui;

/// Application running mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Normal card navigation
    #[default]
    Normal,
    /// Editing the target domain
    EditDomain,
    /// Help dialog
    Help,
}

/// Shared application state
pub struct AppState {
    /// Current application mode
    pub mode: AppMode,

    /// Card the cursor is on
    pub selected: ScanKind,

    /// Target domain input
    pub domain: TextInputState,

    /// Per-kind result board
    pub board: ScanBoard,

    /// Whether the application should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: Option<String>,

    /// Status message timestamp (for auto-clear)
    pub status_timestamp: Option<std::time::Instant>,

    /// Detail panel scroll offset
    pub detail_scroll: u16,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::default(),
            selected: ScanKind::Subdomain,
            domain: TextInputState::new().with_placeholder("example.com"),
            board: ScanBoard::new(),
            should_quit: false,
            status_message: None,
            status_timestamp: None,
            detail_scroll: 0,
        }
    }
}

impl AppState {
    /// Result of the selected card, if any
    pub fn selected_result(&self) -> Option<&RunState> {
        self.board.result(self.selected)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_timestamp = Some(std::time::Instant::now());
    }
}

/// The application: state, backend client, and in-flight run handles
pub struct App {
    /// Application configuration
    pub config: Config,

    /// Shared application state
    pub state: Arc<RwLock<AppState>>,

    /// Backend scan client
    pub backend: BackendClient,

    /// Event channel sender
    event_tx: mpsc::Sender<AppEvent>,

    /// Event channel receiver
    event_rx: mpsc::Receiver<AppEvent>,

    /// Abort handles for in-flight runs, one per kind at most
    running: HashMap<ScanKind, AbortHandle>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel(256);

        let backend = BackendClient::new(&config.backend)?;

        Ok(Self {
            config,
            state: Arc::new(RwLock::new(AppState::default())),
            backend,
            event_tx,
            event_rx,
            running: HashMap::new(),
        })
    }

    /// Sender half of the app event channel
    pub fn event_sender(&self) -> mpsc::Sender<AppEvent> {
        self.event_tx.clone()
    }

    /// Receive the next queued app event (scan settlements, statuses)
    ///
    /// The TUI loop drains these itself; headless drivers and tests use
    /// this to observe settlements directly.
    pub async fn recv_event(&mut self) -> Option<AppEvent> {
        self.event_rx.recv().await
    }

    /// Run the application in TUI mode
    pub async fn run_tui(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let tick_rate = Duration::from_millis(self.config.general.tick_rate_ms);
        let event_handler = EventHandler::new(tick_rate);

        let result = self.main_loop(&mut tui, event_handler).await;

        // View teardown aborts whatever is still in flight
        self.abort_all();
        tui.exit()?;

        result
    }

    /// Run the application in headless mode
    ///
    /// Drives the same backend client without a terminal: runs the named
    /// kind (or all five, sequentially) and prints a JSON report to stdout.
    pub async fn run_headless(&mut self, target: Option<&str>, test: Option<&str>) -> Result<()> {
        let domain = target.context("Headless mode requires --target")?;

        let kinds: Vec<ScanKind> = match test {
            Some(id) => {
                let kind = ScanKind::from_id(id)
                    .with_context(|| format!("Unknown test '{}' (expected one of subdomain, api, files, webapp, idor)", id))?;
                vec![kind]
            }
            None => ScanKind::all().to_vec(),
        };

        let mut report = serde_json::Map::new();
        let mut failures = 0usize;

        for kind in kinds {
            tracing::info!(%kind, %domain, "running scan");
            match self.backend.run_scan(kind, domain).await {
                Ok(success) => {
                    report.insert(
                        kind.id().to_string(),
                        serde_json::json!({
                            "status": "success",
                            "message": SUCCESS_MESSAGE,
                            "duration_ms": success.duration_ms,
                            "payload": success.payload,
                        }),
                    );
                }
                Err(err) => {
                    failures += 1;
                    report.insert(
                        kind.id().to_string(),
                        serde_json::json!({
                            "status": "error",
                            "message": err.run_message(),
                        }),
                    );
                }
            }
        }

        println!("{}", serde_json::to_string_pretty(&serde_json::Value::Object(report))?);

        if failures > 0 {
            anyhow::bail!("{} scan(s) failed", failures);
        }
        Ok(())
    }

    /// Main TUI event loop
    async fn main_loop(&mut self, tui: &mut Tui, mut event_handler: EventHandler) -> Result<()> {
        loop {
            if self.state.read().should_quit {
                break;
            }

            // Clear old status messages (after 5 seconds)
            {
                let mut state = self.state.write();
                if let Some(timestamp) = state.status_timestamp {
                    if timestamp.elapsed() > Duration::from_secs(5) {
                        state.status_message = None;
                        state.status_timestamp = None;
                    }
                }
            }

            // Draw UI
            tui.draw(self)?;

            // Handle terminal events
            if let Some(event) = event_handler.next().await {
                self.handle_event(event).await?;
            }

            // Drain settlements delivered by scan tasks
            while let Ok(event) = self.event_rx.try_recv() {
                self.handle_event(event).await?;
            }
        }

        Ok(())
    }

    /// Handle an application event
    pub async fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Quit => {
                self.state.write().should_quit = true;
            }
            AppEvent::Key(key) => {
                self.handle_key(key).await?;
            }
            AppEvent::Resize(width, height) => {
                tracing::debug!("Terminal resized to {}x{}", width, height);
            }
            AppEvent::ScanSettled { kind, seq, outcome } => {
                self.apply_settlement(kind, seq, outcome);
            }
            AppEvent::Status(msg) => {
                self.state.write().set_status(msg);
            }
            AppEvent::Tick => {}
        }

        Ok(())
    }

    /// Handle keyboard input
    async fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> Result<()> {
        use crossterm::event::{KeyCode, KeyModifiers};

        let mode = self.state.read().mode;

        // Ctrl-C quits from any mode
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.state.write().should_quit = true;
            return Ok(());
        }

        match mode {
            AppMode::Help => {
                // Any key dismisses help
                self.state.write().mode = AppMode::Normal;
            }
            AppMode::EditDomain => self.handle_edit_domain_key(key),
            AppMode::Normal => self.handle_normal_key(key),
        }

        Ok(())
    }

    fn handle_edit_domain_key(&mut self, key: crossterm::event::KeyEvent) {
        use crossterm::event::KeyCode;

        let mut state = self.state.write();
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                state.mode = AppMode::Normal;
                state.domain.focused = false;
            }
            _ => {
                state.domain.handle_key(key);
            }
        }
    }

    fn handle_normal_key(&mut self, key: crossterm::event::KeyEvent) {
        use crossterm::event::KeyCode;

        match key.code {
            KeyCode::Char('q') => {
                self.state.write().should_quit = true;
            }
            KeyCode::Char('?') => {
                self.state.write().mode = AppMode::Help;
            }
            KeyCode::Char('e') | KeyCode::Char('i') | KeyCode::Char('/') => {
                let mut state = self.state.write();
                state.mode = AppMode::EditDomain;
                state.domain.focused = true;
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                let mut state = self.state.write();
                state.selected = state.selected.next();
                state.detail_scroll = 0;
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                let mut state = self.state.write();
                state.selected = state.selected.prev();
                state.detail_scroll = 0;
            }
            KeyCode::Enter | KeyCode::Char('r') => {
                let kind = self.state.read().selected;
                self.start_scan(kind);
            }
            KeyCode::Char('x') => {
                let kind = self.state.read().selected;
                self.cancel_scan(kind);
            }
            KeyCode::PageDown => {
                let mut state = self.state.write();
                state.detail_scroll = state.detail_scroll.saturating_add(10);
            }
            KeyCode::PageUp => {
                let mut state = self.state.write();
                state.detail_scroll = state.detail_scroll.saturating_sub(10);
            }
            KeyCode::Home => {
                self.state.write().detail_scroll = 0;
            }
            _ => {}
        }
    }

    /// Dispatch a scan run for `kind`
    ///
    /// Sets the card pending synchronously, then spawns the request. Gating
    /// is per kind: an empty domain or a duplicate run of the same kind
    /// blocks dispatch, other kinds' runs do not.
    pub fn start_scan(&mut self, kind: ScanKind) {
        let (domain, seq) = {
            let mut state = self.state.write();
            let domain = state.domain.value.trim().to_string();

            if domain.is_empty() {
                state.set_status("Enter a target domain first ('e' to edit)");
                return;
            }
            if state.board.is_in_flight(kind) {
                state.set_status(format!("{} scan already running", kind.id()));
                return;
            }

            let seq = state.board.begin(kind);
            state.detail_scroll = 0;
            (domain, seq)
        };

        let client = self.backend.clone();
        let tx = self.event_tx.clone();
        let handle = tokio::spawn(async move {
            let outcome = client.run_scan(kind, &domain).await;
            let _ = tx.send(AppEvent::ScanSettled { kind, seq, outcome }).await;
        });
        self.running.insert(kind, handle.abort_handle());

        tracing::info!(%kind, seq, "scan dispatched");
    }

    /// Abort the in-flight run of `kind`, if any
    pub fn cancel_scan(&mut self, kind: ScanKind) {
        if let Some(handle) = self.running.remove(&kind) {
            handle.abort();
            let mut state = self.state.write();
            state.board.cancel(kind);
            state.set_status(format!("Cancelled {} scan", kind.id()));
            tracing::info!(%kind, "scan cancelled");
        }
    }

    fn apply_settlement(
        &mut self,
        kind: ScanKind,
        seq: u64,
        outcome: Result<crate::backend::ScanSuccess, crate::error::BackendError>,
    ) {
        let run_state = match outcome {
            Ok(success) => RunState::success(
                ScanPayload::new(kind, success.payload),
                success.duration_ms,
            ),
            Err(ref err) => {
                tracing::warn!(%kind, error = %err, "scan settled with error");
                RunState::from_backend_error(err)
            }
        };

        let applied = self.state.write().board.settle(kind, seq, run_state);
        if applied {
            self.running.remove(&kind);
            self.state
                .write()
                .set_status(format!("{} scan settled", kind.id()));
        } else {
            tracing::debug!(%kind, seq, "discarding stale scan settlement");
        }
    }

    /// Abort every in-flight run (view teardown)
    fn abort_all(&mut self) {
        for (kind, handle) in self.running.drain() {
            tracing::debug!(%kind, "aborting in-flight scan on teardown");
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::RUNNING_MESSAGE;
    use crossterm::event::{KeyCode, KeyEvent};

    fn app() -> App {
        App::new(Config::default()).unwrap()
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::from(code))
    }

    #[tokio::test]
    async fn test_edit_mode_round_trip() {
        let mut app = app();

        app.handle_event(key(KeyCode::Char('e'))).await.unwrap();
        assert_eq!(app.state.read().mode, AppMode::EditDomain);

        for c in "example.com".chars() {
            app.handle_event(key(KeyCode::Char(c))).await.unwrap();
        }
        app.handle_event(key(KeyCode::Esc)).await.unwrap();

        let state = app.state.read();
        assert_eq!(state.mode, AppMode::Normal);
        assert_eq!(state.domain.value, "example.com");
    }

    #[tokio::test]
    async fn test_start_scan_requires_domain() {
        let mut app = app();
        app.start_scan(ScanKind::Subdomain);

        let state = app.state.read();
        assert!(state.board.result(ScanKind::Subdomain).is_none());
        assert!(state.status_message.is_some());
    }

    #[tokio::test]
    async fn test_start_scan_sets_pending_synchronously() {
        let mut app = app();
        app.state.write().domain.value = "example.com".to_string();

        app.start_scan(ScanKind::Api);

        // Pending is visible before any settlement is processed
        let state = app.state.read();
        let result = state.board.result(ScanKind::Api).unwrap();
        assert!(result.is_pending());
        assert_eq!(result.message, RUNNING_MESSAGE);
        assert!(state.board.is_in_flight(ScanKind::Api));
        assert!(!state.board.is_in_flight(ScanKind::Subdomain));
    }

    #[tokio::test]
    async fn test_duplicate_dispatch_of_same_kind_is_gated() {
        let mut app = app();
        app.state.write().domain.value = "example.com".to_string();

        app.start_scan(ScanKind::Files);
        app.start_scan(ScanKind::Files);

        assert_eq!(app.running.len(), 1);
    }

    #[tokio::test]
    async fn test_independent_kinds_run_concurrently() {
        let mut app = app();
        app.state.write().domain.value = "example.com".to_string();

        app.start_scan(ScanKind::Subdomain);
        app.start_scan(ScanKind::Webapp);

        let state = app.state.read();
        assert!(state.board.is_in_flight(ScanKind::Subdomain));
        assert!(state.board.is_in_flight(ScanKind::Webapp));
    }

    #[tokio::test]
    async fn test_stale_settlement_is_discarded() {
        let mut app = app();
        app.state.write().domain.value = "example.com".to_string();

        app.start_scan(ScanKind::Idor);
        app.cancel_scan(ScanKind::Idor);

        // A settlement from the aborted run (seq 1) arrives late
        app.handle_event(AppEvent::ScanSettled {
            kind: ScanKind::Idor,
            seq: 1,
            outcome: Err(crate::error::BackendError::Connect("late".into())),
        })
        .await
        .unwrap();

        let state = app.state.read();
        assert_eq!(
            state.board.result(ScanKind::Idor).unwrap().message,
            crate::scan::CANCELLED_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_help_dismisses_on_any_key() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('?'))).await.unwrap();
        assert_eq!(app.state.read().mode, AppMode::Help);

        app.handle_event(key(KeyCode::Char('z'))).await.unwrap();
        assert_eq!(app.state.read().mode, AppMode::Normal);
    }

    #[tokio::test]
    async fn test_card_navigation_wraps() {
        let mut app = app();
        assert_eq!(app.state.read().selected, ScanKind::Subdomain);

        app.handle_event(key(KeyCode::Up)).await.unwrap();
        assert_eq!(app.state.read().selected, ScanKind::Idor);

        app.handle_event(key(KeyCode::Down)).await.unwrap();
        assert_eq!(app.state.read().selected, ScanKind::Subdomain);
    }
}
