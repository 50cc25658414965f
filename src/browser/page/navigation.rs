//! Page navigation methods.

use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::{Event, PageCommand, ParsedEvent};

use super::Page;

// ============================================================================
// Constants
// ============================================================================

/// Lifecycle milestone a navigation waits for.
const NETWORK_IDLE: &str = "networkIdle";

// ============================================================================
// Page - Navigation
// ============================================================================

impl Page {
    /// Navigates to a URL and waits until the network is idle.
    ///
    /// The whole operation, including the wait, is bounded by `wait`.
    ///
    /// # Errors
    ///
    /// - [`Error::Navigation`] if the browser reports a load failure
    /// - [`Error::Timeout`] if the page does not settle within `wait`
    pub async fn goto(&self, url: &str, wait: Duration) -> Result<()> {
        debug!(url = %url, session_id = %self.inner.session_id, "Navigating");
        self.pace().await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let session_id = self.inner.session_id.clone();
        let connection = self.inner.browser.connection();

        let subscription = connection.subscribe(Box::new(move |event: &Event| {
            if event.is_from(&session_id)
                && let ParsedEvent::Lifecycle { loader_id, name, .. } = event.parse()
            {
                let _ = tx.send((loader_id, name));
            }
        }));

        let outcome = timeout(wait, async {
            let result = self
                .send_with_timeout(
                    PageCommand::Navigate {
                        url: url.to_string(),
                    }
                    .into(),
                    wait,
                )
                .await?;

            if let Some(error_text) = result.get("errorText").and_then(Value::as_str)
                && !error_text.is_empty()
            {
                return Err(Error::navigation(url, error_text));
            }

            // Same-document navigations carry no loader.
            let Some(loader_id) = result.get("loaderId").and_then(Value::as_str) else {
                return Ok(());
            };

            while let Some((event_loader, name)) = rx.recv().await {
                if event_loader == loader_id && name == NETWORK_IDLE {
                    return Ok(());
                }
            }

            Err(Error::ConnectionClosed)
        })
        .await;

        connection.unsubscribe(subscription);

        outcome.map_err(|_| {
            Error::timeout(format!("navigation to {url}"), wait.as_millis() as u64)
        })??;

        debug!(url = %url, "Navigation settled");
        Ok(())
    }
}
