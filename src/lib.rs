//! Scandeck - terminal dashboard for remote security scans
//!
//! Drives a backend scan service over HTTP: one POST per scan run,
//! JSON results rendered per test card in a Ratatui view.

pub mod app;
pub mod backend;
pub mod error;
pub mod scan;
pub mod tui;

pub use error::*;
