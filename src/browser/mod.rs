//! Browser entities module.
//!
//! This module provides the core browser automation types:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Browser`] | Browser process (owns the process, connection, and profile) |
//! | [`Page`] | Tab in an isolated browser context |
//! | [`Element`] | DOM element reference |
//! | [`By`] | Element locator strategy |
//! | [`WaitState`] | Condition an element wait resolves on |
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use webchat_relay::{By, Driver, Result, WaitState};
//!
//! # async fn example() -> Result<()> {
//! let driver = Driver::builder().headless().build()?;
//! let browser = driver.launch().await?;
//! let page = browser.new_page().await?;
//!
//! page.goto("https://example.com", Duration::from_secs(30)).await?;
//! if let Some(heading) = page.wait_for(&By::css("h1"), WaitState::Visible, Duration::from_secs(5)).await? {
//!     let text = heading.inner_text().await?;
//! }
//! browser.close().await;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Browser process handle.
pub mod core;

/// DOM element interaction.
pub mod element;

/// Page automation.
pub mod page;

/// JavaScript sources injected into pages.
pub mod scripts;

/// Element locator strategies.
pub mod selector;

// ============================================================================
// Re-exports
// ============================================================================

pub use core::Browser;
pub(crate) use core::ProcessGuard;
pub use element::Element;
pub use page::Page;
pub use selector::{By, WaitState};
