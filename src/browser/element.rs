//! DOM element interaction.
//!
//! Elements are remote object handles owned by the page's JavaScript
//! runtime. Every action is a `Runtime.callFunctionOn` with `this` bound to
//! the element.
//!
//! # Example
//!
//! ```ignore
//! let input = page
//!     .wait_for(&By::css("textarea"), WaitState::Visible, Duration::from_secs(5))
//!     .await?
//!     .expect("input rendered");
//!
//! input.fill("안녕하세요").await?;
//! let text = input.inner_text().await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::identifiers::ObjectId;

use super::page::Page;
use super::scripts;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for an element.
pub(crate) struct ElementInner {
    /// Remote object handle.
    pub object_id: ObjectId,

    /// Page where this element exists.
    pub page: Page,
}

// ============================================================================
// Element
// ============================================================================

/// A handle to a DOM element in a page.
#[derive(Clone)]
pub struct Element {
    /// Shared inner state.
    pub(crate) inner: Arc<ElementInner>,
}

// ============================================================================
// Element - Display
// ============================================================================

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("object_id", &self.inner.object_id)
            .field("session_id", self.inner.page.session_id())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Element - Constructor
// ============================================================================

impl Element {
    /// Creates a new element handle.
    pub(crate) fn new(object_id: ObjectId, page: Page) -> Self {
        Self {
            inner: Arc::new(ElementInner { object_id, page }),
        }
    }
}

// ============================================================================
// Element - Accessors
// ============================================================================

impl Element {
    /// Returns the remote object handle.
    #[inline]
    #[must_use]
    pub fn object_id(&self) -> &ObjectId {
        &self.inner.object_id
    }
}

// ============================================================================
// Element - Actions
// ============================================================================

impl Element {
    /// Scrolls the element into view and clicks it.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is detached or the click throws.
    pub async fn click(&self) -> Result<()> {
        debug!(object_id = %self.inner.object_id, "Clicking element");
        self.inner.page.pace().await;
        self.call(scripts::CLICK, &[]).await?;
        Ok(())
    }

    /// Replaces the element's content with `text`.
    ///
    /// Works on `<input>`, `<textarea>`, and `contenteditable` editors.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is detached or not editable.
    pub async fn fill(&self, text: &str) -> Result<()> {
        debug!(object_id = %self.inner.object_id, len = text.chars().count(), "Filling element");
        self.inner.page.pace().await;
        self.call(scripts::FILL, &[Value::from(text)]).await?;
        Ok(())
    }
}

// ============================================================================
// Element - Properties
// ============================================================================

impl Element {
    /// Gets the element's rendered text.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is detached.
    pub async fn inner_text(&self) -> Result<String> {
        let value = self.call(scripts::INNER_TEXT, &[]).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }
}

// ============================================================================
// Element - Internal
// ============================================================================

impl Element {
    async fn call(&self, function: &str, args: &[Value]) -> Result<Value> {
        self.inner
            .page
            .call_function(&self.inner.object_id, function, args)
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
