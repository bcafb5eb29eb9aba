//! Application event handling

use crossterm::event::{self, Event, KeyEvent};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::backend::ScanSuccess;
use crate::error::BackendError;
use crate::scan::ScanKind;

/// Application events
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Quit the application
    Quit,

    /// Keyboard input
    Key(KeyEvent),

    /// Terminal resize
    Resize(u16, u16),

    /// Tick for animations/updates
    Tick,

    /// A dispatched scan run settled
    ///
    /// `seq` ties the settlement to the run that produced it; stale
    /// settlements (cancelled or superseded runs) are discarded on apply.
    ScanSettled {
        kind: ScanKind,
        seq: u64,
        outcome: Result<ScanSuccess, BackendError>,
    },

    /// Status message
    Status(String),
}

/// Handles terminal events and converts them to AppEvents
pub struct EventHandler {
    /// Tick rate for periodic updates
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Get the next event
    pub async fn next(&mut self) -> Option<AppEvent> {
        // Poll for terminal events
        if event::poll(self.tick_rate).ok()? {
            match event::read().ok()? {
                Event::Key(key) => Some(AppEvent::Key(key)),
                Event::Resize(width, height) => Some(AppEvent::Resize(width, height)),
                _ => Some(AppEvent::Tick),
            }
        } else {
            Some(AppEvent::Tick)
        }
    }
}

/// Channel used by spawned scan tasks to deliver settlements to the loop
pub type EventSender = mpsc::Sender<AppEvent>;
