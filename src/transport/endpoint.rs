//! DevTools endpoint discovery.
//!
//! A browser launched with `--remote-debugging-port=0` picks a free port and
//! announces the browser-level WebSocket URL on stderr:
//!
//! ```text
//! DevTools listening on ws://127.0.0.1:38261/devtools/browser/6f0c...
//! ```
//!
//! [`discover`] reads stderr until that line appears, then keeps draining
//! the stream in the background so the browser never blocks on a full pipe.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Timeout for the browser to announce its endpoint.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Marker preceding the WebSocket URL on stderr.
const LISTENING_MARKER: &str = "DevTools listening on ";

// ============================================================================
// Public Functions
// ============================================================================

/// Waits for the DevTools WebSocket URL on the browser's stderr.
///
/// # Errors
///
/// - [`Error::ConnectionTimeout`] if no endpoint is announced in time
/// - [`Error::Connection`] if stderr closes first (the browser exited)
pub async fn discover<R>(stderr: R, wait: Duration) -> Result<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut lines = BufReader::new(stderr).lines();

    let ws_url = timeout(wait, read_endpoint(&mut lines))
        .await
        .map_err(|_| Error::connection_timeout(wait.as_millis() as u64))??;

    tokio::spawn(async move {
        while let Ok(Some(line)) = lines.next_line().await {
            trace!(target: "webchat_relay::browser_stderr", "{line}");
        }
    });

    debug!(url = %ws_url, "DevTools endpoint discovered");
    Ok(ws_url)
}

/// Extracts the WebSocket URL from one stderr line, if present.
#[must_use]
pub fn parse_listening_line(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once(LISTENING_MARKER)?;
    let url = rest.trim();
    (url.starts_with("ws://") || url.starts_with("wss://")).then_some(url)
}

// ============================================================================
// Internal Functions
// ============================================================================

async fn read_endpoint<R>(lines: &mut Lines<BufReader<R>>) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    while let Some(line) = lines.next_line().await? {
        if let Some(url) = parse_listening_line(&line) {
            return Ok(url.to_string());
        }
        trace!(target: "webchat_relay::browser_stderr", "{line}");
    }

    Err(Error::connection(
        "browser exited before announcing its DevTools endpoint",
    ))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listening_line() {
        let line = "DevTools listening on ws://127.0.0.1:38261/devtools/browser/6f0c-11";
        assert_eq!(
            parse_listening_line(line),
            Some("ws://127.0.0.1:38261/devtools/browser/6f0c-11")
        );
    }

    #[test]
    fn test_parse_ignores_other_lines() {
        assert_eq!(parse_listening_line("[1015/101010.1:ERROR:gpu] oops"), None);
        assert_eq!(parse_listening_line("DevTools listening on nothing"), None);
    }

    #[tokio::test]
    async fn test_discover_skips_noise() {
        let stderr: &'static [u8] = b"[WARNING] sandbox disabled\n\
            DevTools listening on ws://127.0.0.1:9222/devtools/browser/abc\n\
            later output\n";

        let url = discover(stderr, Duration::from_secs(1))
            .await
            .expect("endpoint");
        assert_eq!(url, "ws://127.0.0.1:9222/devtools/browser/abc");
    }

    #[tokio::test]
    async fn test_discover_fails_when_stream_ends() {
        let stderr: &'static [u8] = b"crashed\n";
        let err = discover(stderr, Duration::from_secs(1)).await.unwrap_err();
        assert!(err.is_connection_error());
    }
}
