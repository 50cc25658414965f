//! Browser process handle.
//!
//! Each [`Browser`] owns:
//! - One browser process (child process)
//! - One DevTools WebSocket connection
//! - One temporary profile directory
//!
//! Pages are opened in their own browser contexts, so they share no
//! cookies or storage with each other.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::process::Child;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::driver::Profile;
use crate::error::{Error, Result};
use crate::identifiers::{BrowserContextId, SessionId, TargetId};
use crate::protocol::{BrowserCommand, Command, Request, TargetCommand};
use crate::transport::Connection;

use super::page::Page;

// ============================================================================
// Constants
// ============================================================================

/// Time allowed for `Browser.close` before the process is killed.
const GRACEFUL_CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Time allowed for the killed process to be reaped.
const REAP_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// ProcessGuard
// ============================================================================

/// Guards a child process and ensures it is killed when dropped.
pub(crate) struct ProcessGuard {
    /// The child process handle.
    child: Option<Child>,
    /// Process ID for logging.
    pid: u32,
}

impl ProcessGuard {
    /// Creates a new process guard.
    pub(crate) fn new(child: Child) -> Self {
        let pid = child.id().unwrap_or(0);
        debug!(pid, "Process guard created");
        Self {
            child: Some(child),
            pid,
        }
    }

    /// Kills the process and waits for it to exit.
    async fn kill(&mut self) {
        if let Some(mut child) = self.child.take() {
            debug!(pid = self.pid, "Killing browser process");
            if let Err(e) = child.start_kill() {
                debug!(pid = self.pid, error = %e, "Failed to kill process");
            }
            match timeout(REAP_TIMEOUT, child.wait()).await {
                Ok(Ok(status)) => info!(pid = self.pid, %status, "Process terminated"),
                Ok(Err(e)) => debug!(pid = self.pid, error = %e, "Failed to wait for process"),
                Err(_) => warn!(pid = self.pid, "Process did not exit in time"),
            }
        }
    }

    /// Returns the process ID.
    #[inline]
    pub(crate) fn pid(&self) -> u32 {
        self.pid
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take()
            && let Err(e) = child.start_kill()
        {
            debug!(pid = self.pid, error = %e, "Failed to send kill signal in Drop");
        }
    }
}

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a browser.
pub(crate) struct BrowserInner {
    /// DevTools connection.
    pub connection: Connection,
    /// Protected process handle (`None` once closed).
    process: Mutex<Option<ProcessGuard>>,
    /// Profile directory (`None` once closed).
    profile: Mutex<Option<Profile>>,
    /// Process ID for logging.
    pid: u32,
    /// Delay inserted before page actions.
    pub slow_mo: Option<Duration>,
    /// Set once [`Browser::close`] has run.
    closed: AtomicBool,
}

// ============================================================================
// Browser
// ============================================================================

/// A handle to a running browser process.
///
/// When the last handle is dropped without [`close`](Browser::close), the
/// process is sent a kill signal and the profile directory is removed.
#[derive(Clone)]
pub struct Browser {
    /// Shared inner state.
    pub(crate) inner: Arc<BrowserInner>,
}

// ============================================================================
// Browser - Display
// ============================================================================

impl fmt::Debug for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Browser")
            .field("pid", &self.inner.pid)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Browser - Constructor
// ============================================================================

impl Browser {
    /// Creates a new browser handle.
    pub(crate) fn new(
        connection: Connection,
        process: ProcessGuard,
        profile: Profile,
        slow_mo: Option<Duration>,
    ) -> Self {
        let pid = process.pid();

        Self {
            inner: Arc::new(BrowserInner {
                connection,
                process: Mutex::new(Some(process)),
                profile: Mutex::new(Some(profile)),
                pid,
                slow_mo,
                closed: AtomicBool::new(false),
            }),
        }
    }
}

// ============================================================================
// Browser - Accessors
// ============================================================================

impl Browser {
    /// Returns the browser process ID.
    #[inline]
    #[must_use]
    pub fn pid(&self) -> u32 {
        self.inner.pid
    }

    /// Returns `true` once [`close`](Self::close) has run.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

// ============================================================================
// Browser - Pages
// ============================================================================

impl Browser {
    /// Opens a blank page in a fresh, isolated browser context.
    ///
    /// # Errors
    ///
    /// Returns an error if the context, target, or session cannot be created.
    pub async fn new_page(&self) -> Result<Page> {
        if self.is_closed() {
            return Err(Error::ConnectionClosed);
        }

        let value = self
            .send(
                TargetCommand::CreateBrowserContext {
                    dispose_on_detach: true,
                }
                .into(),
            )
            .await?;
        let context_id = BrowserContextId::new(required_str(&value, "browserContextId")?);

        let value = self
            .send(
                TargetCommand::CreateTarget {
                    url: "about:blank".to_string(),
                    browser_context_id: Some(context_id.clone()),
                }
                .into(),
            )
            .await?;
        let target_id = TargetId::new(required_str(&value, "targetId")?);

        let value = self
            .send(
                TargetCommand::AttachToTarget {
                    target_id: target_id.clone(),
                    flatten: true,
                }
                .into(),
            )
            .await?;
        let session_id = SessionId::new(required_str(&value, "sessionId")?);

        debug!(
            context_id = %context_id,
            target_id = %target_id,
            session_id = %session_id,
            "Page attached"
        );

        let page = Page::new(self.clone(), context_id, target_id, session_id);
        page.enable().await?;
        Ok(page)
    }
}

// ============================================================================
// Browser - Lifecycle
// ============================================================================

impl Browser {
    /// Closes the browser, kills the process, and removes the profile.
    ///
    /// Safe to call more than once; later calls do nothing. Failures along
    /// the way are logged, never returned, so every step always runs.
    pub async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        debug!(pid = self.inner.pid, "Closing browser");

        let request = Request::browser(BrowserCommand::Close.into());
        if let Err(e) = self
            .inner
            .connection
            .send_with_timeout(request, GRACEFUL_CLOSE_TIMEOUT)
            .await
        {
            debug!(error = %e, "Browser.close failed, killing process");
        }

        self.inner.connection.shutdown();

        let process = self.inner.process.lock().take();
        if let Some(mut process) = process {
            process.kill().await;
        }

        drop(self.inner.profile.lock().take());
        info!(pid = self.inner.pid, "Browser closed");
    }
}

// ============================================================================
// Browser - Internal
// ============================================================================

impl Browser {
    /// Sends a browser-level command and returns its result.
    pub(crate) async fn send(&self, command: Command) -> Result<Value> {
        let method = command.method();
        let request = Request::browser(command);
        self.inner
            .connection
            .send(request)
            .await?
            .into_result(method)
    }

    /// Returns the shared connection.
    #[inline]
    pub(crate) fn connection(&self) -> &Connection {
        &self.inner.connection
    }
}

/// Reads a required string field from a command result.
pub(crate) fn required_str(value: &Value, key: &str) -> Result<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::protocol(format!("Expected {key} in response")))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_browser_is_clone_and_debug() {
        fn assert_traits<T: Clone + fmt::Debug + Send + Sync>() {}
        assert_traits::<Browser>();
    }

    #[test]
    fn test_required_str() {
        let value = json!({"targetId": "T1"});
        assert_eq!(required_str(&value, "targetId").expect("present"), "T1");

        let err = required_str(&value, "sessionId").unwrap_err();
        assert!(err.to_string().contains("sessionId"));
    }

    #[tokio::test]
    async fn test_process_guard_kills_child() {
        let child = tokio::process::Command::new("sleep")
            .arg("30")
            .spawn()
            .expect("spawn sleep");

        let mut guard = ProcessGuard::new(child);
        assert!(guard.pid() > 0);

        guard.kill().await;
        assert!(guard.child.is_none());
    }
}
