//! Scandeck - terminal dashboard for remote security scans
//!
//! A TUI front end for a backend scan service: subdomain enumeration, API
//! fuzzing, file discovery, web vulnerability scanning, and IDOR checks.

use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{execute, terminal};
use tokio::sync::broadcast;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use scandeck::app::{App, Config};

/// Terminal dashboard for remote security scans
#[derive(Parser, Debug)]
#[command(name = "scandeck")]
#[command(author, version, about = "Terminal dashboard for remote security scans", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SCANDECK_CONFIG")]
    config: Option<String>,

    /// Scan backend base URL (overrides configuration)
    #[arg(short, long, env = "SCANDECK_BACKEND_URL")]
    backend_url: Option<String>,

    /// Run in headless mode (no TUI)
    #[arg(long, env = "SCANDECK_HEADLESS")]
    headless: bool,

    /// Target domain for headless mode
    #[arg(long)]
    target: Option<String>,

    /// Scan to run in headless mode (subdomain, api, files, webapp, idor); all when omitted
    #[arg(long)]
    test: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "SCANDECK_LOG_LEVEL")]
    log_level: String,

    /// Log file path (enables file logging)
    #[arg(long, env = "SCANDECK_LOG_FILE")]
    log_file: Option<String>,

    /// Enable JSON structured logging
    #[arg(long, env = "SCANDECK_LOG_JSON")]
    log_json: bool,

    /// Generate default configuration and exit
    #[arg(long)]
    generate_config: bool,

    /// Validate configuration and exit
    #[arg(long)]
    validate_config: bool,
}

/// Global flag for graceful shutdown
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle special commands first
    if cli.generate_config {
        return generate_default_config();
    }

    // Set up panic hook for terminal restoration
    setup_panic_hook();

    // Initialize logging
    init_logging(&cli)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Scandeck"
    );

    // Load and validate configuration
    let config = load_config(&cli)?;

    if cli.validate_config {
        tracing::info!("Configuration is valid");
        return Ok(());
    }

    // Create shutdown signal channel
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let shutdown_flag = Arc::new(AtomicBool::new(false));

    // Spawn signal handler
    let shutdown_tx_clone = shutdown_tx.clone();
    let shutdown_flag_clone = shutdown_flag.clone();
    tokio::spawn(async move {
        handle_signals(shutdown_tx_clone, shutdown_flag_clone).await;
    });

    // Run the application
    let result = run_app(cli, config, shutdown_tx.subscribe()).await;

    tracing::info!("Scandeck shutting down gracefully");

    result
}

/// Set up panic hook to restore terminal state
fn setup_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        // Try to restore terminal state
        let _ = terminal::disable_raw_mode();
        let _ = execute!(std::io::stdout(), terminal::LeaveAlternateScreen);

        // Call original panic hook
        original_hook(panic_info);
    }));
}

/// Initialize the logging system
fn init_logging(cli: &Cli) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if let Some(log_path) = &cli.log_file {
        // File-based logging with rotation
        let file_appender = if log_path.contains('/') || log_path.contains('\\') {
            let path = std::path::Path::new(log_path);
            let dir = path.parent().unwrap_or(std::path::Path::new("."));
            let filename = path.file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("scandeck.log");
            RollingFileAppender::new(Rotation::DAILY, dir, filename)
        } else {
            let log_dir = Config::data_dir()
                .map(|d| d.join("logs"))
                .unwrap_or_else(|_| std::path::PathBuf::from("."));
            std::fs::create_dir_all(&log_dir).ok();
            RollingFileAppender::new(Rotation::DAILY, log_dir, log_path)
        };

        if cli.log_json {
            let file_layer = fmt::layer()
                .json()
                .with_writer(file_appender)
                .with_ansi(false);

            subscriber.with(file_layer).init();
        } else {
            let file_layer = fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false);

            subscriber.with(file_layer).init();
        }
    } else if cli.headless {
        // Console logging for headless mode
        if cli.log_json {
            subscriber.with(fmt::layer().json()).init();
        } else {
            subscriber.with(fmt::layer()).init();
        }
    } else {
        // TUI mode: log to file in data directory, don't pollute stdout
        let log_dir = Config::data_dir()
            .map(|d| d.join("logs"))
            .unwrap_or_else(|_| std::path::PathBuf::from("."));
        std::fs::create_dir_all(&log_dir).ok();

        let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "scandeck.log");
        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false);

        subscriber.with(file_layer).init();
    }

    Ok(())
}

/// Load configuration with CLI overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;

    // Apply CLI overrides
    if let Some(backend_url) = &cli.backend_url {
        config.backend.base_url = backend_url.clone();
    }

    validate_config(&config)?;

    Ok(config)
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    url::Url::parse(&config.backend.base_url)
        .with_context(|| format!("Invalid backend base_url '{}'", config.backend.base_url))?;

    if config.backend.request_timeout == 0 {
        anyhow::bail!("Backend request_timeout must be greater than 0");
    }

    if config.general.tick_rate_ms == 0 {
        anyhow::bail!("General tick_rate_ms must be greater than 0");
    }

    Ok(())
}

/// Generate default configuration file
fn generate_default_config() -> Result<()> {
    let config = Config::default();
    let toml = toml::to_string_pretty(&config)
        .context("Failed to serialize configuration")?;

    println!("{}", toml);
    Ok(())
}

/// Handle shutdown signals
async fn handle_signals(shutdown_tx: broadcast::Sender<()>, shutdown_flag: Arc<AtomicBool>) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");
        let mut sigterm = signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");

        tokio::select! {
            _ = sigint.recv() => {
                tracing::info!("Received SIGINT, initiating shutdown");
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, initiating shutdown");
            }
        }
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c().await.expect("Failed to register Ctrl+C handler");
        tracing::info!("Received Ctrl+C, initiating shutdown");
    }

    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
    shutdown_flag.store(true, Ordering::SeqCst);
    let _ = shutdown_tx.send(());
}

/// Run the main application
async fn run_app(
    cli: Cli,
    config: Config,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    let mut app = App::new(config)?;

    if cli.headless {
        tracing::info!("Running in headless mode");

        tokio::select! {
            result = app.run_headless(cli.target.as_deref(), cli.test.as_deref()) => {
                result?;
            }
            _ = shutdown_rx.recv() => {
                tracing::info!("Shutdown signal received");
            }
        }
    } else {
        tokio::select! {
            result = app.run_tui() => {
                result?;
            }
            _ = shutdown_rx.recv() => {
                tracing::info!("Shutdown signal received, closing TUI");
                // Terminal cleanup is handled by the panic hook and TUI module
            }
        }
    }

    Ok(())
}
