//! Element observation and page text.

use std::time::Duration;

use tracing::debug;

use crate::browser::Element;
use crate::browser::scripts;
use crate::browser::selector::{By, WaitState};
use crate::error::Result;

use super::Page;

// ============================================================================
// Constants
// ============================================================================

/// Extra time granted to the command carrying an in-page wait.
const WAIT_COMMAND_SLACK: Duration = Duration::from_secs(5);

// ============================================================================
// Page - Text
// ============================================================================

impl Page {
    /// Returns the rendered text of the document body.
    ///
    /// # Errors
    ///
    /// Returns an error if the script fails.
    pub async fn body_text(&self) -> Result<String> {
        let value = self.evaluate(scripts::BODY_TEXT).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }
}

// ============================================================================
// Page - Element Observation
// ============================================================================

impl Page {
    /// Waits for an element matching `by` to reach `state`.
    ///
    /// Uses a MutationObserver inside the page. Resolves to `None` once
    /// `timeout` elapses without a match.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let send = page
    ///     .wait_for(&By::has_text("button", "Send"), WaitState::Visible, Duration::from_secs(3))
    ///     .await?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup script fails or the connection drops.
    pub async fn wait_for(
        &self,
        by: &By,
        state: WaitState,
        timeout: Duration,
    ) -> Result<Option<Element>> {
        let timeout_ms = timeout.as_millis() as u64;
        let expression = scripts::wait_for_element(by, state, timeout_ms);

        let handle = self
            .evaluate_handle(expression, timeout + WAIT_COMMAND_SLACK)
            .await?;

        debug!(locator = %by, %state, timeout_ms, found = handle.is_some(), "Element wait finished");
        Ok(handle.map(|object_id| Element::new(object_id, self.clone())))
    }
}
