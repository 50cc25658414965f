//! Error types for the relay.
//!
//! This module defines the error type shared by the browser driver layers
//! (`driver`, `transport`, `browser`). The chat flow wraps these in
//! [`FlowError`](crate::chat::FlowError) to classify which step failed.
//!
//! # Usage
//!
//! All fallible driver operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use std::time::Duration;
//! use webchat_relay::{Page, Result};
//!
//! async fn example(page: &Page) -> Result<String> {
//!     page.goto("https://example.com", Duration::from_secs(30)).await?;
//!     page.body_text().await
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::Profile`] |
//! | Process | [`Error::BrowserNotFound`], [`Error::ProcessLaunchFailed`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::ConnectionClosed`] |
//! | Protocol | [`Error::Protocol`], [`Error::Cdp`] |
//! | Page | [`Error::Navigation`], [`Error::ScriptError`] |
//! | Timing | [`Error::Timeout`], [`Error::RequestTimeout`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::WebSocket`], [`Error::Url`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::RequestId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the driver layers.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when driver or chat configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Profile error.
    ///
    /// Returned when the temporary user data directory cannot be prepared.
    #[error("Profile error: {message}")]
    Profile {
        /// Description of the profile error.
        message: String,
    },

    /// Browser binary not found.
    #[error("Browser not found at: {path}")]
    BrowserNotFound {
        /// Path where the browser was expected.
        path: PathBuf,
    },

    /// Failed to launch the browser process.
    #[error("Failed to launch browser: {message}")]
    ProcessLaunchFailed {
        /// Description of the launch failure.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// The browser did not announce its DevTools endpoint in time.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// WebSocket connection closed unexpectedly.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Protocol violation or unexpected response.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// Error object returned by the browser for a command.
    #[error("DevTools error {code} in {method}: {message}")]
    Cdp {
        /// Method that failed.
        method: String,
        /// Numeric error code from the browser.
        code: i64,
        /// Error message from the browser.
        message: String,
    },

    // ========================================================================
    // Page Errors
    // ========================================================================
    /// Navigation failed before the page settled.
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// Target URL.
        url: String,
        /// Browser-reported failure text.
        message: String,
    },

    /// JavaScript execution error.
    #[error("Script error: {message}")]
    ScriptError {
        /// Error message from script execution.
        message: String,
    },

    // ========================================================================
    // Timing Errors
    // ========================================================================
    /// Operation timeout.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Command request timeout.
    #[error("Request {request_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request ID that timed out.
        request_id: RequestId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// URL parse error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a profile error.
    #[inline]
    pub fn profile(message: impl Into<String>) -> Self {
        Self::Profile {
            message: message.into(),
        }
    }

    /// Creates a browser not found error.
    #[inline]
    pub fn browser_not_found(path: impl Into<PathBuf>) -> Self {
        Self::BrowserNotFound { path: path.into() }
    }

    /// Creates a process launch failed error.
    #[inline]
    pub fn process_launch_failed(err: IoError) -> Self {
        Self::ProcessLaunchFailed {
            message: err.to_string(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a DevTools command error.
    #[inline]
    pub fn cdp(method: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
        Self::Cdp {
            method: method.into(),
            code,
            message: message.into(),
        }
    }

    /// Creates a navigation error.
    #[inline]
    pub fn navigation(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Navigation {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a script error.
    #[inline]
    pub fn script_error(message: impl Into<String>) -> Self {
        Self::ScriptError {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            request_id,
            timeout_ms,
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout { .. } | Self::Timeout { .. } | Self::RequestTimeout { .. }
        )
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionTimeout { .. }
                | Self::ConnectionClosed
                | Self::WebSocket(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "Connection failed: failed to connect");
    }

    #[test]
    fn test_navigation_display() {
        let err = Error::navigation("https://chat.example", "net::ERR_NAME_NOT_RESOLVED");
        assert_eq!(
            err.to_string(),
            "Navigation to https://chat.example failed: net::ERR_NAME_NOT_RESOLVED"
        );
    }

    #[test]
    fn test_cdp_display() {
        let err = Error::cdp("Page.navigate", -32000, "Cannot navigate");
        assert_eq!(
            err.to_string(),
            "DevTools error -32000 in Page.navigate: Cannot navigate"
        );
    }

    #[test]
    fn test_is_timeout() {
        let timeout_err = Error::timeout("navigate", 30_000);
        let request_err = Error::request_timeout(RequestId::new(7), 1000);
        let other_err = Error::connection("test");

        assert!(timeout_err.is_timeout());
        assert!(request_err.is_timeout());
        assert!(!other_err.is_timeout());
    }

    #[test]
    fn test_is_connection_error() {
        assert!(Error::connection("test").is_connection_error());
        assert!(Error::connection_timeout(1000).is_connection_error());
        assert!(Error::ConnectionClosed.is_connection_error());
        assert!(!Error::config("test").is_connection_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_url_error() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = url_err.into();
        assert!(matches!(err, Error::Url(_)));
    }
}
