//! HTTP client for the scan backend

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::app::BackendConfig;
use crate::error::BackendError;
use crate::scan::{ScanKind, ScanRequest};

/// Default message when a failed scan body carries no `error` field
const DEFAULT_SCAN_ERROR: &str = "failed to execute the scan";

/// A settled, successful scan run
#[derive(Debug, Clone)]
pub struct ScanSuccess {
    /// Parsed backend body, opaque to the caller
    pub payload: Value,

    /// HTTP status of the response
    pub status: u16,

    pub duration_ms: u64,
}

/// Client for the backend scan service
///
/// Cheap to clone; each dispatched run gets its own handle.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl BackendClient {
    /// Create a new backend client from configuration
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .user_agent(&config.user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.request_timeout,
        })
    }

    /// Endpoint for a scan kind
    pub fn scan_url(&self, kind: ScanKind) -> String {
        format!("{}/scan/{}", self.base_url, kind.id())
    }

    /// Run one scan to completion
    ///
    /// One POST, no retries. 2xx bodies parse as the opaque result payload;
    /// non-2xx bodies are mined for an `error` string with a generic
    /// fallback. Transport and parse failures map into the backend taxonomy.
    pub async fn run_scan(&self, kind: ScanKind, domain: &str) -> Result<ScanSuccess, BackendError> {
        let url = self.scan_url(kind);
        let body = ScanRequest {
            domain: domain.to_string(),
        };

        tracing::debug!(%kind, %domain, %url, "dispatching scan");
        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::from_request_error(&e, self.timeout_secs))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::from_request_error(&e, self.timeout_secs))?;
        let duration_ms = start.elapsed().as_millis() as u64;

        if status.is_success() {
            let payload: Value = serde_json::from_slice(&bytes)
                .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

            tracing::info!(%kind, status = status.as_u16(), duration_ms, "scan completed");
            Ok(ScanSuccess {
                payload,
                status: status.as_u16(),
                duration_ms,
            })
        } else {
            let message = extract_error_message(&bytes);
            tracing::warn!(%kind, status = status.as_u16(), %message, "scan failed");
            Err(BackendError::Scan {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Pull the `error` string out of a failed scan body, if it is JSON at all
fn extract_error_message(bytes: &[u8]) -> String {
    serde_json::from_slice::<Value>(bytes)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_SCAN_ERROR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::BackendConfig;

    #[test]
    fn test_client_creation() {
        let config = BackendConfig::default();
        assert!(BackendClient::new(&config).is_ok());
    }

    #[test]
    fn test_scan_url_is_path_parameterized() {
        let client = BackendClient::new(&BackendConfig::default()).unwrap();
        assert_eq!(client.scan_url(ScanKind::Subdomain), "http://localhost:5000/scan/subdomain");
        assert_eq!(client.scan_url(ScanKind::Idor), "http://localhost:5000/scan/idor");
    }

    #[test]
    fn test_trailing_slash_in_base_url_is_trimmed() {
        let config = BackendConfig {
            base_url: "http://localhost:5000/".to_string(),
            ..BackendConfig::default()
        };
        let client = BackendClient::new(&config).unwrap();
        assert_eq!(client.scan_url(ScanKind::Api), "http://localhost:5000/scan/api");
    }

    #[test]
    fn test_error_extraction_prefers_body_field() {
        assert_eq!(extract_error_message(br#"{"error":"tool not found"}"#), "tool not found");
        assert_eq!(extract_error_message(br#"{"detail":"nope"}"#), DEFAULT_SCAN_ERROR);
        assert_eq!(extract_error_message(b"<html>Internal Server Error</html>"), DEFAULT_SCAN_ERROR);
        assert_eq!(extract_error_message(br#"{"error":""}"#), DEFAULT_SCAN_ERROR);
    }
}
