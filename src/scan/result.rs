//! Per-card run lifecycle
//!
//! Each scan kind moves through `absent -> pending -> {success | error}`,
//! last write wins. `ScanBoard` owns that state for all five kinds plus the
//! per-kind in-flight and sequence bookkeeping that keeps settlements from
//! cancelled runs out of the board.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::BackendError;

use super::{ScanKind, ScanPayload};

/// Fixed message shown while a run is in flight
pub const RUNNING_MESSAGE: &str = "Scan running...";

/// Fixed message shown when a run settles successfully
pub const SUCCESS_MESSAGE: &str = "Scan completed successfully";

/// Message shown when the user aborts a run
pub const CANCELLED_MESSAGE: &str = "Scan cancelled";

/// Status tag for a card's latest result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Success,
    Error,
}

/// Latest result for one scan kind
#[derive(Debug, Clone, Serialize)]
pub struct RunState {
    pub status: RunStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<ScanPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl RunState {
    pub fn pending() -> Self {
        Self {
            status: RunStatus::Pending,
            message: RUNNING_MESSAGE.to_string(),
            payload: None,
            duration_ms: None,
        }
    }

    pub fn success(payload: ScanPayload, duration_ms: u64) -> Self {
        Self {
            status: RunStatus::Success,
            message: SUCCESS_MESSAGE.to_string(),
            payload: Some(payload),
            duration_ms: Some(duration_ms),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Error,
            message: message.into(),
            payload: None,
            duration_ms: None,
        }
    }

    pub fn from_backend_error(err: &BackendError) -> Self {
        Self::error(err.run_message())
    }

    pub fn is_pending(&self) -> bool {
        self.status == RunStatus::Pending
    }
}

/// Result board for all five cards
///
/// The key set of `results` is always a subset of the scan catalog, one
/// entry per kind at most. Sequence numbers advance on every dispatch and
/// cancellation so late settlements from a superseded run are discarded.
#[derive(Debug, Default)]
pub struct ScanBoard {
    results: HashMap<ScanKind, RunState>,
    in_flight: HashSet<ScanKind>,
    seq: HashMap<ScanKind, u64>,
}

impl ScanBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&self, kind: ScanKind) -> Option<&RunState> {
        self.results.get(&kind)
    }

    pub fn is_in_flight(&self, kind: ScanKind) -> bool {
        self.in_flight.contains(&kind)
    }

    pub fn any_in_flight(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Whether a run of `kind` may be dispatched right now
    ///
    /// Only the empty domain and a duplicate submission of the same kind
    /// gate a run; other kinds being in flight never do.
    pub fn can_run(&self, kind: ScanKind, domain: &str) -> bool {
        !domain.trim().is_empty() && !self.is_in_flight(kind)
    }

    /// Mark `kind` pending and return the sequence number for this run
    pub fn begin(&mut self, kind: ScanKind) -> u64 {
        let seq = self.bump_seq(kind);
        self.in_flight.insert(kind);
        self.results.insert(kind, RunState::pending());
        seq
    }

    /// Apply a settlement if it belongs to the current run of `kind`
    ///
    /// Returns false when the sequence is stale (the run was cancelled or
    /// superseded) and the settlement was discarded.
    pub fn settle(&mut self, kind: ScanKind, seq: u64, state: RunState) -> bool {
        if self.current_seq(kind) != seq {
            return false;
        }
        self.in_flight.remove(&kind);
        self.results.insert(kind, state);
        true
    }

    /// Abort the in-flight run of `kind`, if any
    pub fn cancel(&mut self, kind: ScanKind) -> bool {
        if !self.in_flight.remove(&kind) {
            return false;
        }
        self.bump_seq(kind);
        self.results.insert(kind, RunState::error(CANCELLED_MESSAGE));
        true
    }

    fn current_seq(&self, kind: ScanKind) -> u64 {
        self.seq.get(&kind).copied().unwrap_or(0)
    }

    fn bump_seq(&mut self, kind: ScanKind) -> u64 {
        let entry = self.seq.entry(kind).or_insert(0);
        *entry += 1;
        *entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn success_state(kind: ScanKind, raw: serde_json::Value) -> RunState {
        RunState::success(ScanPayload::new(kind, raw), 42)
    }

    #[test]
    fn test_begin_sets_pending_synchronously() {
        let mut board = ScanBoard::new();
        board.begin(ScanKind::Subdomain);

        let state = board.result(ScanKind::Subdomain).unwrap();
        assert!(state.is_pending());
        assert_eq!(state.message, RUNNING_MESSAGE);
        assert!(state.payload.is_none());
    }

    #[test]
    fn test_begin_leaves_other_kinds_untouched() {
        let mut board = ScanBoard::new();
        let seq = board.begin(ScanKind::Api);
        board.settle(ScanKind::Api, seq, RunState::error("boom"));

        board.begin(ScanKind::Subdomain);

        assert_eq!(board.result(ScanKind::Api).unwrap().status, RunStatus::Error);
        assert!(board.result(ScanKind::Files).is_none());
    }

    #[test]
    fn test_settle_success_replaces_pending() {
        let mut board = ScanBoard::new();
        let seq = board.begin(ScanKind::Subdomain);

        let raw = json!([{"host": "a.example.com"}]);
        assert!(board.settle(ScanKind::Subdomain, seq, success_state(ScanKind::Subdomain, raw.clone())));

        let state = board.result(ScanKind::Subdomain).unwrap();
        assert_eq!(state.status, RunStatus::Success);
        assert_eq!(state.message, SUCCESS_MESSAGE);
        assert_eq!(state.payload.as_ref().unwrap().raw, raw);
        assert!(!board.is_in_flight(ScanKind::Subdomain));
    }

    #[test]
    fn test_per_kind_gating_not_global() {
        let mut board = ScanBoard::new();
        board.begin(ScanKind::Subdomain);

        assert!(!board.can_run(ScanKind::Subdomain, "example.com"));
        for kind in [ScanKind::Api, ScanKind::Files, ScanKind::Webapp, ScanKind::Idor] {
            assert!(board.can_run(kind, "example.com"), "{} should stay runnable", kind);
        }
    }

    #[test]
    fn test_cannot_run_with_empty_domain() {
        let board = ScanBoard::new();
        assert!(!board.can_run(ScanKind::Subdomain, ""));
        assert!(!board.can_run(ScanKind::Subdomain, "   "));
        assert!(board.can_run(ScanKind::Subdomain, "example.com"));
    }

    #[test]
    fn test_rerun_discards_previous_result() {
        let mut board = ScanBoard::new();
        let first = board.begin(ScanKind::Idor);
        board.settle(ScanKind::Idor, first, success_state(ScanKind::Idor, json!([{"url": "a"}])));

        let second = board.begin(ScanKind::Idor);
        assert!(board.result(ScanKind::Idor).unwrap().is_pending());

        board.settle(ScanKind::Idor, second, RunState::error("tool not found"));
        let state = board.result(ScanKind::Idor).unwrap();
        assert_eq!(state.status, RunStatus::Error);
        assert_eq!(state.message, "tool not found");
        assert!(state.payload.is_none());
    }

    #[test]
    fn test_cancel_settles_as_error_and_discards_late_settlement() {
        let mut board = ScanBoard::new();
        let seq = board.begin(ScanKind::Webapp);

        assert!(board.cancel(ScanKind::Webapp));
        let state = board.result(ScanKind::Webapp).unwrap();
        assert_eq!(state.status, RunStatus::Error);
        assert_eq!(state.message, CANCELLED_MESSAGE);

        // The aborted task's settlement arrives afterwards and is stale
        assert!(!board.settle(ScanKind::Webapp, seq, success_state(ScanKind::Webapp, json!([]))));
        assert_eq!(board.result(ScanKind::Webapp).unwrap().message, CANCELLED_MESSAGE);
    }

    #[test]
    fn test_cancel_without_run_is_noop() {
        let mut board = ScanBoard::new();
        assert!(!board.cancel(ScanKind::Files));
        assert!(board.result(ScanKind::Files).is_none());
    }

    #[test]
    fn test_rerun_allowed_after_settlement() {
        let mut board = ScanBoard::new();
        let seq = board.begin(ScanKind::Api);
        assert!(!board.can_run(ScanKind::Api, "example.com"));

        board.settle(ScanKind::Api, seq, RunState::error("connection refused"));
        assert!(board.can_run(ScanKind::Api, "example.com"));
    }
}
