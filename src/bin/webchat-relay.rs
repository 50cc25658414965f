//! Webchat Relay CLI.
//!
//! Sends one message to the configured chat page and prints exactly one JSON
//! line on stdout. Diagnostics go to stderr.
//!
//! Usage:
//!   $ webchat-relay "추천해줘"
//!   $ webchat-relay --headless --config chat.json "hello" session-123
//!   $ RUST_LOG=webchat_relay=debug webchat-relay "hello"

// ============================================================================
// Imports
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use webchat_relay::chat::config::{DEFAULT_APOLOGY_TEMPLATE, ERROR_PLACEHOLDER};
use webchat_relay::{BrowserOptions, ChatConfig, ChatRelay, Driver, Error, ResultPayload};

// ============================================================================
// Constants
// ============================================================================

/// Message sent when none is given.
const DEFAULT_MESSAGE: &str = "안녕하세요";

/// Default pause before each page action, in milliseconds.
const DEFAULT_SLOW_MO_MS: u64 = 100;

// ============================================================================
// Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "webchat-relay",
    version,
    about = "Send one message to a browser-rendered chat page and print the reply as JSON"
)]
struct Cli {
    /// Message to send.
    #[arg(default_value = DEFAULT_MESSAGE)]
    message: String,

    /// Conversation id (accepted, currently ignored).
    session_id: Option<String>,

    /// Chat page URL (overrides the config file).
    #[arg(long)]
    url: Option<String>,

    /// JSON file with chat settings.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Browser binary (auto-detected on PATH otherwise).
    #[arg(long, value_name = "PATH")]
    browser: Option<PathBuf>,

    /// Run the browser without a window.
    #[arg(long)]
    headless: bool,

    /// Wait for the reply to render, in milliseconds.
    #[arg(long, value_name = "MS")]
    settle_ms: Option<u64>,

    /// Pause before each page action, in milliseconds (0 disables).
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_SLOW_MO_MS)]
    slow_mo_ms: u64,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

// ============================================================================
// Setup
// ============================================================================

/// Filter directive used when `RUST_LOG` is unset.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "webchat_relay=info",
        1 => "webchat_relay=debug",
        _ => "webchat_relay=trace",
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Loads the config file (if any) and applies flag overrides.
fn load_config(cli: &Cli) -> webchat_relay::Result<ChatConfig> {
    let mut config = match &cli.config {
        Some(path) => ChatConfig::from_file(path)?,
        None => ChatConfig::default(),
    };

    if let Some(url) = &cli.url {
        config = config.with_url(url.clone());
    }
    if let Some(ms) = cli.settle_ms {
        config = config.with_reply_settle(Duration::from_millis(ms));
    }

    config.validate()?;
    Ok(config)
}

/// Builds the driver from flags.
fn build_driver(cli: &Cli) -> webchat_relay::Result<Driver> {
    let mut options = BrowserOptions::new();
    if cli.headless {
        options = options.with_headless();
    }
    if cli.slow_mo_ms > 0 {
        options = options.with_slow_mo(Duration::from_millis(cli.slow_mo_ms));
    }

    let mut builder = Driver::builder().options(options);
    if let Some(path) = &cli.browser {
        builder = builder.binary(path.clone());
    }
    builder.build()
}

/// Failure payload for errors before the flow starts.
fn setup_failure(err: &Error, config: Option<&ChatConfig>) -> ResultPayload {
    ResultPayload::failure(err, |error| match config {
        Some(config) => config.apology(error),
        None => DEFAULT_APOLOGY_TEMPLATE.replace(ERROR_PLACEHOLDER, error),
    })
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!(?cli, "Starting");

    let payload = match load_config(&cli) {
        Err(e) => setup_failure(&e, None),
        Ok(config) => match build_driver(&cli) {
            Err(e) => setup_failure(&e, Some(&config)),
            Ok(driver) => {
                ChatRelay::new(driver, config)
                    .run(&cli.message, cli.session_id.as_deref())
                    .await
            }
        },
    };

    match payload.emit(io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Failed to write result");
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
