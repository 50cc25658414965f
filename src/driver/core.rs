//! Browser driver and process launcher.
//!
//! The [`Driver`] holds the launch configuration and turns it into running
//! [`Browser`] instances: one process, one temporary profile, and one
//! DevTools connection each.
//!
//! # Example
//!
//! ```no_run
//! use webchat_relay::Driver;
//!
//! # async fn example() -> webchat_relay::Result<()> {
//! let driver = Driver::builder().headless().build()?;
//!
//! let browser = driver.launch().await?;
//! let page = browser.new_page().await?;
//! page.goto("https://example.com", std::time::Duration::from_secs(30)).await?;
//! browser.close().await;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::browser::{Browser, ProcessGuard};
use crate::error::{Error, Result};
use crate::transport::Connection;
use crate::transport::endpoint::{self, DISCOVERY_TIMEOUT};

use super::builder::DriverBuilder;
use super::options::BrowserOptions;
use super::profile::Profile;

// ============================================================================
// Constants
// ============================================================================

/// Flags every launch carries regardless of options.
const BASE_ARGS: &[&str] = &[
    "--remote-debugging-port=0",
    "--no-first-run",
    "--no-default-browser-check",
    "--disable-background-networking",
    "--disable-sync",
    "--disable-popup-blocking",
];

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for the driver.
pub(crate) struct DriverInner {
    /// Path to the browser binary executable.
    pub binary: PathBuf,

    /// Launch options applied to every browser.
    pub options: BrowserOptions,
}

// ============================================================================
// Driver
// ============================================================================

/// Browser launcher.
///
/// The driver is responsible for:
/// - Spawning browser processes with fresh profiles
/// - Discovering each process's DevTools endpoint
/// - Handing back a connected [`Browser`]
#[derive(Clone)]
pub struct Driver {
    /// Shared inner state.
    pub(crate) inner: Arc<DriverInner>,
}

// ============================================================================
// Driver - Display
// ============================================================================

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("binary", &self.inner.binary)
            .field("headless", &self.inner.options.headless)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Driver - Public API
// ============================================================================

impl Driver {
    /// Creates a configuration builder for the driver.
    #[inline]
    #[must_use]
    pub fn builder() -> DriverBuilder {
        DriverBuilder::new()
    }

    /// Returns the browser binary path.
    #[inline]
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.inner.binary
    }

    /// Returns the launch options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &BrowserOptions {
        &self.inner.options
    }

    /// Launches a new browser process and connects to it.
    ///
    /// If any step fails, the process is killed and the profile removed
    /// before the error is returned.
    ///
    /// # Errors
    ///
    /// - [`Error::Profile`] if the profile directory cannot be created
    /// - [`Error::ProcessLaunchFailed`] if the process fails to spawn
    /// - [`Error::ConnectionTimeout`] if no DevTools endpoint is announced
    /// - [`Error::Connection`] if the WebSocket handshake fails
    pub async fn launch(&self) -> Result<Browser> {
        let profile = Profile::new_temp()?;

        let mut child = self.spawn_browser_process(&profile)?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::protocol("Browser stderr was not captured"))?;

        let process = ProcessGuard::new(child);
        info!(pid = process.pid(), "Browser process spawned");

        let ws_url = endpoint::discover(stderr, DISCOVERY_TIMEOUT).await?;
        let connection = Connection::connect(&ws_url).await?;

        Ok(Browser::new(
            connection,
            process,
            profile,
            self.inner.options.slow_mo,
        ))
    }
}

// ============================================================================
// Driver - Internal API
// ============================================================================

impl Driver {
    /// Creates a new driver instance.
    pub(crate) fn new(binary: PathBuf, options: BrowserOptions) -> Self {
        debug!(binary = %binary.display(), "Driver initialized");

        Self {
            inner: Arc::new(DriverInner { binary, options }),
        }
    }

    /// Builds the full argument list for one launch.
    pub(crate) fn launch_args(&self, profile_dir: &Path) -> Vec<String> {
        let mut args: Vec<String> = BASE_ARGS.iter().map(|s| (*s).to_string()).collect();
        args.push(format!("--user-data-dir={}", profile_dir.display()));
        args.extend(self.inner.options.to_args());
        args.push("about:blank".to_string());
        args
    }

    /// Spawns the browser process with stderr piped for endpoint discovery.
    fn spawn_browser_process(&self, profile: &Profile) -> Result<Child> {
        let mut cmd = Command::new(&self.inner.binary);

        cmd.args(self.launch_args(profile.path()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        cmd.spawn().map_err(Error::process_launch_failed)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_is_clone_and_debug() {
        fn assert_traits<T: Clone + fmt::Debug>() {}
        assert_traits::<Driver>();
    }

    #[test]
    fn test_launch_args_layout() {
        let driver = Driver::new(
            PathBuf::from("/usr/bin/chromium"),
            BrowserOptions::new().with_headless().with_lang("ko-KR"),
        );

        let args = driver.launch_args(Path::new("/tmp/profile"));

        assert_eq!(args[0], "--remote-debugging-port=0");
        assert!(args.contains(&"--user-data-dir=/tmp/profile".to_string()));
        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--lang=ko-KR".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("about:blank"));
    }

    #[tokio::test]
    async fn test_launch_fails_when_binary_is_not_a_browser() {
        let driver = Driver::new(PathBuf::from("/bin/false"), BrowserOptions::new());
        let err = driver.launch().await.unwrap_err();
        assert!(err.is_connection_error() || matches!(err, Error::ProcessLaunchFailed { .. }));
    }
}
