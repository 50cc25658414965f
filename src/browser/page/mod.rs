//! Page automation and control.
//!
//! Each [`Page`] is one tab attached through a flattened DevTools session,
//! living in its own browser context.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Page struct, command routing, teardown |
//! | `navigation` | URL navigation with network-idle wait |
//! | `script` | JavaScript evaluation and remote calls |
//! | `elements` | Element lookup and observation |
//!
//! # Example
//!
//! ```ignore
//! let page = browser.new_page().await?;
//!
//! page.goto("https://example.com", Duration::from_secs(30)).await?;
//!
//! if let Some(button) = page.wait_for(&By::css("#submit"), WaitState::Visible, Duration::from_secs(3)).await? {
//!     button.click().await?;
//! }
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod core;
mod elements;
mod navigation;
mod script;

// ============================================================================
// Re-exports
// ============================================================================

pub use core::Page;
