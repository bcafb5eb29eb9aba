//! Terminal setup and teardown

use anyhow::{bail, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};

use crate::app::App;

/// Minimum terminal width
pub const MIN_WIDTH: u16 = 80;
/// Minimum terminal height
pub const MIN_HEIGHT: u16 = 24;

/// Terminal wrapper for TUI operations
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Create a new TUI instance
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal })
    }

    /// Check if terminal size meets minimum requirements
    pub fn check_size(&self) -> Result<()> {
        let size = self.terminal.size()?;
        if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
            bail!(
                "Terminal too small: {}x{} (minimum: {}x{})",
                size.width,
                size.height,
                MIN_WIDTH,
                MIN_HEIGHT
            );
        }
        Ok(())
    }

    /// Enter the TUI (setup terminal)
    pub fn enter(&mut self) -> Result<()> {
        self.check_size()?;

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;

        // Note: Panic hook is set up in main.rs - don't duplicate it here
        // as that would cause issues if enter() is called multiple times

        self.terminal.hide_cursor()?;
        self.terminal.clear()?;

        Ok(())
    }

    /// Exit the TUI (restore terminal)
    pub fn exit(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;

        Ok(())
    }

    /// Draw the UI
    pub fn draw(&mut self, app: &App) -> Result<()> {
        self.terminal.draw(|frame| {
            super::render(frame, app);
        })?;

        Ok(())
    }

    /// Get terminal size
    pub fn size(&self) -> Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }

    /// Force a full redraw
    pub fn force_redraw(&mut self) -> Result<()> {
        self.terminal.clear()?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Best effort cleanup - restore terminal to normal state
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
