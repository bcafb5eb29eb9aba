//! Custom error types for Scandeck
//!
//! Provides structured error handling with context propagation
//! and user-friendly error messages.

use thiserror::Error;

/// Main error type for Scandeck operations
#[derive(Error, Debug)]
pub enum ScandeckError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend scan service errors
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// TUI errors
    #[error("TUI error: {0}")]
    Tui(#[from] TuiError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {path}")]
    ReadError { path: String, source: std::io::Error },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration value: {field} - {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Configuration file not found: {0}")]
    NotFound(String),
}

/// Errors from the backend scan service boundary
///
/// Cloneable because settled outcomes travel through the app event channel.
#[derive(Error, Debug, Clone)]
pub enum BackendError {
    #[error("Connection error: {0}")]
    Connect(String),

    #[error("Timeout after {0}s")]
    Timeout(u64),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response body: {0}")]
    InvalidResponse(String),

    #[error("Scan failed: {message}")]
    Scan { status: u16, message: String },
}

impl BackendError {
    /// Classify a reqwest error into the backend taxonomy
    pub fn from_request_error(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            BackendError::Timeout(timeout_secs)
        } else if err.is_connect() {
            BackendError::Connect(err.to_string())
        } else {
            BackendError::RequestFailed(err.to_string())
        }
    }

    /// Message rendered inline in the card that triggered the run
    ///
    /// A `Scan` error carries the message extracted from the backend body
    /// verbatim; everything else uses the error display.
    pub fn run_message(&self) -> String {
        let message = match self {
            BackendError::Scan { message, .. } => message.clone(),
            other => other.to_string(),
        };
        if message.is_empty() {
            "unknown error".to_string()
        } else {
            message
        }
    }
}

/// TUI errors
#[derive(Error, Debug)]
pub enum TuiError {
    #[error("Terminal initialization failed: {0}")]
    InitError(String),

    #[error("Terminal size too small: {width}x{height} (minimum: {min_width}x{min_height})")]
    TerminalTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },

    #[error("Input error: {0}")]
    InputError(String),
}

impl ScandeckError {
    /// Create an error with additional context
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ScandeckError::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ScandeckError::Config(e) => format!("Configuration problem: {}", e.user_hint()),
            ScandeckError::Backend(e) => format!("Backend issue: {}", e.user_hint()),
            ScandeckError::Tui(e) => format!("Display issue: {}", e.user_hint()),
            ScandeckError::Io(e) => format!("File system issue: {}", e),
            ScandeckError::WithContext { context, source } => {
                format!("{}: {}", context, source)
            }
        }
    }
}

/// Trait for providing user-friendly hints
pub trait UserHint {
    fn user_hint(&self) -> String;
}

impl UserHint for ConfigError {
    fn user_hint(&self) -> String {
        match self {
            ConfigError::ReadError { path, .. } => {
                format!("Could not read '{}'. Check if the file exists and you have read permissions.", path)
            }
            ConfigError::ParseError(_) => {
                "The configuration file has invalid syntax. Check for TOML formatting errors.".into()
            }
            ConfigError::ValidationError { field, reason } => {
                format!("Invalid value for '{}': {}", field, reason)
            }
            ConfigError::NotFound(path) => {
                format!("Configuration file '{}' not found. Run with --generate-config to create one.", path)
            }
        }
    }
}

impl UserHint for BackendError {
    fn user_hint(&self) -> String {
        match self {
            BackendError::Connect(_) => {
                "Could not connect to the scan backend. Check if it's running and accessible.".into()
            }
            BackendError::Timeout(secs) => {
                format!("Scan timed out after {}s. The backend may still be working; try a longer timeout.", secs)
            }
            BackendError::InvalidResponse(_) => {
                "The backend returned a body that is not valid JSON.".into()
            }
            _ => self.to_string(),
        }
    }
}

impl UserHint for TuiError {
    fn user_hint(&self) -> String {
        match self {
            TuiError::TerminalTooSmall { min_width, min_height, .. } => {
                format!("Terminal too small. Minimum size is {}x{} characters.", min_width, min_height)
            }
            _ => self.to_string(),
        }
    }
}

/// Extension trait for adding context to Result types
pub trait ResultExt<T, E> {
    fn with_context<C>(self, context: C) -> Result<T, ScandeckError>
    where
        C: Into<String>;
}

impl<T, E> ResultExt<T, E> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<C>(self, context: C) -> Result<T, ScandeckError>
    where
        C: Into<String>,
    {
        self.map_err(|e| ScandeckError::with_context(context, e))
    }
}
