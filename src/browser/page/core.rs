//! Core Page struct and accessors.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::browser::Browser;
use crate::error::Result;
use crate::identifiers::{BrowserContextId, SessionId, TargetId};
use crate::protocol::{Command, PageCommand, Request, RuntimeCommand, TargetCommand};
use crate::transport::connection::DEFAULT_COMMAND_TIMEOUT;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a page.
pub(crate) struct PageInner {
    /// Owning browser.
    pub browser: Browser,
    /// Isolated context the page lives in.
    pub context_id: BrowserContextId,
    /// Page target.
    pub target_id: TargetId,
    /// Flattened session attached to the target.
    pub session_id: SessionId,
    /// Set once [`Page::close`] has run.
    closed: AtomicBool,
}

// ============================================================================
// Page
// ============================================================================

/// A handle to a browser page.
///
/// Pages provide methods for navigation, scripting, and element interaction.
#[derive(Clone)]
pub struct Page {
    pub(crate) inner: Arc<PageInner>,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("target_id", &self.inner.target_id)
            .field("session_id", &self.inner.session_id)
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Creates a new page handle.
    pub(crate) fn new(
        browser: Browser,
        context_id: BrowserContextId,
        target_id: TargetId,
        session_id: SessionId,
    ) -> Self {
        Self {
            inner: Arc::new(PageInner {
                browser,
                context_id,
                target_id,
                session_id,
                closed: AtomicBool::new(false),
            }),
        }
    }
}

// ============================================================================
// Page - Accessors
// ============================================================================

impl Page {
    /// Returns the target ID.
    #[inline]
    #[must_use]
    pub fn target_id(&self) -> &TargetId {
        &self.inner.target_id
    }

    /// Returns the session ID.
    #[inline]
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.inner.session_id
    }

    /// Returns the browser context ID.
    #[inline]
    #[must_use]
    pub fn context_id(&self) -> &BrowserContextId {
        &self.inner.context_id
    }

    /// Returns the owning browser.
    #[inline]
    #[must_use]
    pub fn browser(&self) -> &Browser {
        &self.inner.browser
    }
}

// ============================================================================
// Page - Lifecycle
// ============================================================================

impl Page {
    /// Closes the page and disposes its browser context.
    ///
    /// Safe to call more than once. Failures are logged, never returned.
    pub async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let close = TargetCommand::CloseTarget {
            target_id: self.inner.target_id.clone(),
        };
        if let Err(e) = self.inner.browser.send(close.into()).await {
            debug!(target_id = %self.inner.target_id, error = %e, "Failed to close target");
        }

        let dispose = TargetCommand::DisposeBrowserContext {
            browser_context_id: self.inner.context_id.clone(),
        };
        if let Err(e) = self.inner.browser.send(dispose.into()).await {
            debug!(context_id = %self.inner.context_id, error = %e, "Failed to dispose context");
        }

        debug!(target_id = %self.inner.target_id, "Page closed");
    }
}

// ============================================================================
// Page - Internal
// ============================================================================

impl Page {
    /// Enables the domains the page relies on.
    pub(crate) async fn enable(&self) -> Result<()> {
        self.send(PageCommand::Enable.into()).await?;
        self.send(RuntimeCommand::Enable.into()).await?;
        self.send(PageCommand::SetLifecycleEventsEnabled { enabled: true }.into())
            .await?;
        Ok(())
    }

    /// Sends a session command and returns its result.
    pub(crate) async fn send(&self, command: Command) -> Result<Value> {
        self.send_with_timeout(command, DEFAULT_COMMAND_TIMEOUT)
            .await
    }

    /// Sends a session command with a custom response timeout.
    pub(crate) async fn send_with_timeout(
        &self,
        command: Command,
        timeout: Duration,
    ) -> Result<Value> {
        let method = command.method();
        let request = Request::session(self.inner.session_id.clone(), command);
        self.inner
            .browser
            .connection()
            .send_with_timeout(request, timeout)
            .await?
            .into_result(method)
    }

    /// Sleeps for the configured slow-motion delay, if any.
    pub(crate) async fn pace(&self) {
        if let Some(delay) = self.inner.browser.inner.slow_mo {
            tokio::time::sleep(delay).await;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::Page;

    #[test]
    fn test_page_is_clone_and_debug() {
        fn assert_traits<T: Clone + std::fmt::Debug + Send + Sync>() {}
        assert_traits::<Page>();
    }
}
