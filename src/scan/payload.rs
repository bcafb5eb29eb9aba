//! Boundary decoding of backend result payloads
//!
//! The backend returns arbitrary JSON per scan kind. The raw value is kept
//! verbatim for display; alongside it, a best-effort decode into per-kind
//! records feeds the card summary line. Decoding is total: shapes that do
//! not match fall back to `Decoded::Unrecognized`, never to an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ScanKind;

/// A scan result payload: the verbatim backend JSON plus its decoded form
#[derive(Debug, Clone, Serialize)]
pub struct ScanPayload {
    /// Backend body, untouched
    pub raw: Value,

    /// Typed view of the body, when the shape is recognized
    #[serde(skip)]
    pub decoded: Decoded,
}

impl ScanPayload {
    pub fn new(kind: ScanKind, raw: Value) -> Self {
        let decoded = Decoded::from_value(kind, &raw);
        Self { raw, decoded }
    }

    /// Pretty-printed JSON dump for the detail panel
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
    }

    /// Short summary line, when the payload shape was recognized
    pub fn summary(&self) -> Option<String> {
        self.decoded.summary()
    }
}

/// Per-kind typed view of a result payload
#[derive(Debug, Clone, Default)]
pub enum Decoded {
    Subdomains(Vec<SubdomainRecord>),
    Endpoints(Vec<EndpointHit>),
    Files(Vec<FileFinding>),
    WebVulns(Vec<VulnFinding>),
    Idor(Vec<IdorCheck>),
    #[default]
    Unrecognized,
}

impl Decoded {
    /// Decode a backend body for the given kind
    ///
    /// Accepts an array of records or a single record object; anything else
    /// is `Unrecognized`.
    pub fn from_value(kind: ScanKind, value: &Value) -> Self {
        match kind {
            ScanKind::Subdomain => decode_records(value).map(Decoded::Subdomains),
            ScanKind::Api => decode_records(value).map(Decoded::Endpoints),
            ScanKind::Files => decode_records(value).map(Decoded::Files),
            ScanKind::Webapp => decode_records(value).map(Decoded::WebVulns),
            ScanKind::Idor => decode_records(value).map(Decoded::Idor),
        }
        .unwrap_or_default()
    }

    pub fn summary(&self) -> Option<String> {
        match self {
            Decoded::Subdomains(records) => Some(count_label(records.len(), "subdomain", "subdomains")),
            Decoded::Endpoints(hits) => Some(count_label(hits.len(), "endpoint", "endpoints")),
            Decoded::Files(findings) => Some(count_label(findings.len(), "file", "files")),
            Decoded::WebVulns(findings) => {
                let mut label = count_label(findings.len(), "finding", "findings");
                if let Some(worst) = worst_severity(findings) {
                    label.push_str(&format!(", worst: {}", worst));
                }
                Some(label)
            }
            Decoded::Idor(checks) => Some(count_label(checks.len(), "check", "checks")),
            Decoded::Unrecognized => None,
        }
    }
}

fn decode_records<T: for<'de> Deserialize<'de>>(value: &Value) -> Option<Vec<T>> {
    match value {
        Value::Array(_) => serde_json::from_value(value.clone()).ok(),
        Value::Object(_) => serde_json::from_value::<T>(value.clone())
            .ok()
            .map(|record| vec![record]),
        _ => None,
    }
}

fn count_label(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {}", singular)
    } else {
        format!("{} {}", count, plural)
    }
}

fn worst_severity(findings: &[VulnFinding]) -> Option<&str> {
    const ORDER: &[&str] = &["critical", "high", "medium", "low", "info"];
    findings
        .iter()
        .filter_map(|f| f.severity.as_deref())
        .min_by_key(|s| {
            let s = s.to_lowercase();
            ORDER.iter().position(|o| *o == s).unwrap_or(ORDER.len())
        })
}

/// One enumerated subdomain (backend drives Amass)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubdomainRecord {
    pub host: Option<String>,
    pub ip: Option<String>,
    pub takeover: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One discovered endpoint (backend drives ffuf)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointHit {
    pub url: Option<String>,
    pub status: Option<u16>,
    pub length: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One exposed file (backend drives nuclei file templates)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFinding {
    pub url: Option<String>,
    pub template: Option<String>,
    pub severity: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One web vulnerability (backend drives nuclei)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VulnFinding {
    pub name: Option<String>,
    pub url: Option<String>,
    pub severity: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One object-reference check (backend drives httpx)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdorCheck {
    pub url: Option<String>,
    pub status: Option<u16>,
    pub accessible: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subdomain_array_decodes() {
        let raw = json!([{"host": "a.example.com"}, {"host": "b.example.com", "ip": "10.0.0.1"}]);
        let payload = ScanPayload::new(ScanKind::Subdomain, raw.clone());

        assert_eq!(payload.raw, raw);
        match &payload.decoded {
            Decoded::Subdomains(records) => {
                assert_eq!(records.len(), 2);
                assert_eq!(records[0].host.as_deref(), Some("a.example.com"));
                assert_eq!(records[1].ip.as_deref(), Some("10.0.0.1"));
            }
            other => panic!("expected subdomains, got {:?}", other),
        }
        assert_eq!(payload.summary().as_deref(), Some("2 subdomains"));
    }

    #[test]
    fn test_single_object_wraps_into_one_record() {
        let raw = json!({"url": "https://example.com/admin", "status": 200});
        let payload = ScanPayload::new(ScanKind::Api, raw);

        match &payload.decoded {
            Decoded::Endpoints(hits) => {
                assert_eq!(hits.len(), 1);
                assert_eq!(hits[0].status, Some(200));
            }
            other => panic!("expected endpoints, got {:?}", other),
        }
        assert_eq!(payload.summary().as_deref(), Some("1 endpoint"));
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let raw = json!([{"host": "a.example.com", "source": "crt.sh"}]);
        let payload = ScanPayload::new(ScanKind::Subdomain, raw);

        match &payload.decoded {
            Decoded::Subdomains(records) => {
                assert_eq!(records[0].extra.get("source"), Some(&json!("crt.sh")));
            }
            other => panic!("expected subdomains, got {:?}", other),
        }
    }

    #[test]
    fn test_scalar_body_is_unrecognized_not_error() {
        let payload = ScanPayload::new(ScanKind::Webapp, json!("scan queued"));
        assert!(matches!(payload.decoded, Decoded::Unrecognized));
        assert!(payload.summary().is_none());
    }

    #[test]
    fn test_webapp_summary_reports_worst_severity() {
        let raw = json!([
            {"name": "Reflected XSS", "severity": "medium"},
            {"name": "SQL injection", "severity": "critical"},
        ]);
        let payload = ScanPayload::new(ScanKind::Webapp, raw);
        assert_eq!(payload.summary().as_deref(), Some("2 findings, worst: critical"));
    }

    #[test]
    fn test_pretty_round_trips_raw() {
        let raw = json!([{"host": "a.example.com"}]);
        let payload = ScanPayload::new(ScanKind::Subdomain, raw.clone());
        let reparsed: Value = serde_json::from_str(&payload.pretty()).unwrap();
        assert_eq!(reparsed, raw);
    }
}
