//! Scan catalog and per-run state
//!
//! The five scan kinds are a fixed catalog; all scanning happens on the
//! remote backend. This module owns the descriptors and the request/response
//! lifecycle state for each card.

mod payload;
mod result;

pub use payload::{Decoded, EndpointHit, FileFinding, IdorCheck, ScanPayload, SubdomainRecord, VulnFinding};
pub use result::{RunState, RunStatus, ScanBoard, CANCELLED_MESSAGE, RUNNING_MESSAGE, SUCCESS_MESSAGE};

use serde::{Deserialize, Serialize};

/// The fixed set of scans the backend exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    Subdomain,
    Api,
    Files,
    Webapp,
    Idor,
}

impl ScanKind {
    pub fn all() -> &'static [ScanKind] {
        &[
            ScanKind::Subdomain,
            ScanKind::Api,
            ScanKind::Files,
            ScanKind::Webapp,
            ScanKind::Idor,
        ]
    }

    /// Stable identifier, also the backend path segment
    pub fn id(&self) -> &'static str {
        match self {
            ScanKind::Subdomain => "subdomain",
            ScanKind::Api => "api",
            ScanKind::Files => "files",
            ScanKind::Webapp => "webapp",
            ScanKind::Idor => "idor",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ScanKind::Subdomain => "Subdomain Review",
            ScanKind::Api => "API Analysis",
            ScanKind::Files => "Temporary Files",
            ScanKind::Webapp => "Web Vulnerabilities",
            ScanKind::Idor => "IDOR Probe",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScanKind::Subdomain => "Detects orphaned subdomains and possible takeovers using Amass",
            ScanKind::Api => "Hunts for sensitive endpoints using ffuf",
            ScanKind::Files => "Looks for exposed sensitive files using nuclei",
            ScanKind::Webapp => "Tests XSS, SQLi and other vectors using nuclei",
            ScanKind::Idor => "Checks direct object references using httpx",
        }
    }

    /// Card glyph shown next to the title
    pub fn glyph(&self) -> &'static str {
        match self {
            ScanKind::Subdomain => "◈",
            ScanKind::Api => "◎",
            ScanKind::Files => "▤",
            ScanKind::Webapp => "✶",
            ScanKind::Idor => "⚿",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ScanKind::Subdomain => 0,
            ScanKind::Api => 1,
            ScanKind::Files => 2,
            ScanKind::Webapp => 3,
            ScanKind::Idor => 4,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ScanKind::Subdomain => ScanKind::Api,
            ScanKind::Api => ScanKind::Files,
            ScanKind::Files => ScanKind::Webapp,
            ScanKind::Webapp => ScanKind::Idor,
            ScanKind::Idor => ScanKind::Subdomain,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ScanKind::Subdomain => ScanKind::Idor,
            ScanKind::Api => ScanKind::Subdomain,
            ScanKind::Files => ScanKind::Api,
            ScanKind::Webapp => ScanKind::Files,
            ScanKind::Idor => ScanKind::Webapp,
        }
    }

    /// Parse a kind from its identifier (CLI `--test` flag)
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_lowercase().as_str() {
            "subdomain" => Some(ScanKind::Subdomain),
            "api" => Some(ScanKind::Api),
            "files" => Some(ScanKind::Files),
            "webapp" => Some(ScanKind::Webapp),
            "idor" => Some(ScanKind::Idor),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Request body sent to `POST /scan/{kind}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    pub domain: String,
}
