//! Page capabilities the chat flow depends on.
//!
//! The flow never talks to a browser directly. It asks for these two
//! capabilities, which [`Page`] implements over the DevTools connection and
//! tests implement with in-memory fakes.

use std::time::Duration;

use async_trait::async_trait;

use crate::browser::{By, Element, Page, WaitState};
use crate::error::Result;

// ============================================================================
// ElementLookup
// ============================================================================

/// Waits for elements to appear.
#[async_trait]
pub trait ElementLookup: Send + Sync {
    /// Element handle type.
    type Handle: Send + Sync;

    /// Waits up to `timeout` for an element matching `by` in `state`.
    ///
    /// Returns `Ok(None)` when the wait elapses without a match.
    async fn wait_for(
        &self,
        by: &By,
        state: WaitState,
        timeout: Duration,
    ) -> Result<Option<Self::Handle>>;
}

// ============================================================================
// ChatPage
// ============================================================================

/// Element actions needed to send a message and read the reply.
#[async_trait]
pub trait ChatPage: ElementLookup {
    /// Replaces the element's content with `text` verbatim.
    async fn fill(&self, element: &Self::Handle, text: &str) -> Result<()>;

    /// Clicks the element.
    async fn click(&self, element: &Self::Handle) -> Result<()>;

    /// Returns the element's rendered text.
    async fn inner_text(&self, element: &Self::Handle) -> Result<String>;

    /// Returns the rendered text of the whole page body.
    async fn body_text(&self) -> Result<String>;
}

// ============================================================================
// Page Implementation
// ============================================================================

#[async_trait]
impl ElementLookup for Page {
    type Handle = Element;

    async fn wait_for(
        &self,
        by: &By,
        state: WaitState,
        timeout: Duration,
    ) -> Result<Option<Element>> {
        Page::wait_for(self, by, state, timeout).await
    }
}

#[async_trait]
impl ChatPage for Page {
    async fn fill(&self, element: &Element, text: &str) -> Result<()> {
        element.fill(text).await
    }

    async fn click(&self, element: &Element) -> Result<()> {
        element.click().await
    }

    async fn inner_text(&self, element: &Element) -> Result<String> {
        element.inner_text().await
    }

    async fn body_text(&self) -> Result<String> {
        Page::body_text(self).await
    }
}
