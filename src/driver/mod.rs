//! Browser driver module.
//!
//! This module launches Chromium-family browsers and hands back connected
//! [`Browser`](crate::Browser) handles.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Driver`] | Launcher for browser processes |
//! | [`DriverBuilder`] | Fluent configuration builder |
//! | [`BrowserOptions`] | Browser launch options |
//! | [`Profile`] | Temporary user data directory |
//!
//! # Example
//!
//! ```no_run
//! use webchat_relay::{Driver, Result};
//!
//! # async fn example() -> Result<()> {
//! let driver = Driver::builder().headless().build()?;
//! let browser = driver.launch().await?;
//! let page = browser.new_page().await?;
//!
//! page.goto("https://example.com", std::time::Duration::from_secs(30)).await?;
//! browser.close().await;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for driver configuration.
pub mod builder;

/// Core driver implementation.
pub mod core;

/// Browser command-line options.
pub mod options;

/// Temporary profile management.
pub mod profile;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::{DriverBuilder, detect_binary};
pub use core::Driver;
pub use options::BrowserOptions;
pub use profile::Profile;
