//! Element locator strategies.
//!
//! Provides Selenium-like `By` selectors plus the [`WaitState`] an element
//! must reach before a wait resolves.
//!
//! # Example
//!
//! ```ignore
//! use webchat_relay::{By, WaitState};
//!
//! // CSS selector (default)
//! let input = page.wait_for(&By::css("div[contenteditable='true']"), WaitState::Visible, timeout).await?;
//!
//! // Button whose text contains "Send", present in the DOM
//! let send = page.wait_for(&By::has_text("button", "Send"), WaitState::Attached, timeout).await?;
//!
//! // By XPath
//! let btn = page.wait_for(&By::xpath("//button[@type='submit']"), WaitState::Visible, timeout).await?;
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// By Enum
// ============================================================================

/// Element locator strategy (like Selenium's `By`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "value")]
pub enum By {
    /// CSS selector (most common).
    ///
    /// # Example
    /// ```ignore
    /// By::Css("textarea[placeholder*='Message']")
    /// By::Css("div.ProseMirror")
    /// ```
    #[serde(rename = "css")]
    Css(String),

    /// XPath expression.
    ///
    /// # Example
    /// ```ignore
    /// By::XPath("//button[@type='submit']")
    /// ```
    #[serde(rename = "xpath")]
    XPath(String),

    /// Element ID (shorthand for `#id` CSS selector).
    #[serde(rename = "id")]
    Id(String),

    /// Exact text content match.
    ///
    /// Finds the element owning a text node where `text.trim() === value`.
    #[serde(rename = "text")]
    Text(String),

    /// Partial text content match.
    ///
    /// Finds the element owning a text node where `text.includes(value)`.
    #[serde(rename = "partialText")]
    PartialText(String),

    /// CSS selector filtered by contained text.
    ///
    /// Matches the first element selected by `selector` whose rendered text
    /// contains `text` (case-insensitive), like `button:has-text("Send")`.
    #[serde(rename = "hasText")]
    HasText {
        /// CSS selector for candidate elements.
        selector: String,
        /// Text the element must contain.
        text: String,
    },
}

impl By {
    /// Creates a CSS selector.
    #[inline]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Creates an XPath selector.
    #[inline]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Creates an ID selector.
    #[inline]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Creates a text content selector.
    #[inline]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates a partial text content selector.
    #[inline]
    pub fn partial_text(text: impl Into<String>) -> Self {
        Self::PartialText(text.into())
    }

    /// Creates a CSS selector filtered by contained text.
    #[inline]
    pub fn has_text(selector: impl Into<String>, text: impl Into<String>) -> Self {
        Self::HasText {
            selector: selector.into(),
            text: text.into(),
        }
    }

    /// Returns the strategy name understood by the DOM scripts.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Css(_) => "css",
            Self::XPath(_) => "xpath",
            Self::Id(_) => "id",
            Self::Text(_) => "text",
            Self::PartialText(_) => "partialText",
            Self::HasText { .. } => "hasText",
        }
    }

    /// Returns the selector value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Css(v) | Self::XPath(v) | Self::Id(v) | Self::Text(v) | Self::PartialText(v) => v,
            Self::HasText { selector, .. } => selector,
        }
    }

    /// Returns the text filter, if the strategy has one.
    #[must_use]
    pub fn text_filter(&self) -> Option<&str> {
        match self {
            Self::HasText { text, .. } => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text_filter() {
            Some(text) => write!(f, "{}:{}:has-text({text:?})", self.strategy(), self.value()),
            None => write!(f, "{}:{}", self.strategy(), self.value()),
        }
    }
}

// ============================================================================
// From implementations for ergonomics
// ============================================================================

impl From<&str> for By {
    /// Converts a string to CSS selector (default).
    fn from(s: &str) -> Self {
        Self::Css(s.to_string())
    }
}

impl From<String> for By {
    /// Converts a string to CSS selector (default).
    fn from(s: String) -> Self {
        Self::Css(s)
    }
}

// ============================================================================
// WaitState
// ============================================================================

/// Condition an element must meet before a wait resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitState {
    /// Present in the DOM.
    Attached,

    /// Present, rendered, and with a non-empty bounding box.
    #[default]
    Visible,
}

impl WaitState {
    /// Returns the state name understood by the DOM scripts.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Attached => "attached",
            Self::Visible => "visible",
        }
    }
}

impl fmt::Display for WaitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
