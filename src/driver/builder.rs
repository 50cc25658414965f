//! Builder pattern for driver configuration.
//!
//! Provides a fluent API for configuring and creating [`Driver`] instances.
//!
//! # Example
//!
//! ```no_run
//! use webchat_relay::{BrowserOptions, Driver};
//!
//! # fn example() -> webchat_relay::Result<()> {
//! let driver = Driver::builder()
//!     .binary("/usr/bin/chromium")
//!     .options(BrowserOptions::new().with_lang("ko-KR"))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};

use super::core::Driver;
use super::options::BrowserOptions;

// ============================================================================
// Constants
// ============================================================================

/// Executable names probed on `PATH` when no binary is configured.
pub const BINARY_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

// ============================================================================
// DriverBuilder
// ============================================================================

/// Builder for configuring a [`Driver`] instance.
///
/// Use [`Driver::builder()`] to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct DriverBuilder {
    /// Path to the browser binary.
    binary: Option<PathBuf>,
    /// Launch options.
    options: BrowserOptions,
}

// ============================================================================
// DriverBuilder Implementation
// ============================================================================

impl DriverBuilder {
    /// Creates a new driver builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path to the browser binary executable.
    ///
    /// When unset, [`build`](Self::build) searches `PATH` for a
    /// Chromium-family browser.
    #[inline]
    #[must_use]
    pub fn binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = Some(path.into());
        self
    }

    /// Sets the browser launch options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: BrowserOptions) -> Self {
        self.options = options;
        self
    }

    /// Enables headless mode.
    #[inline]
    #[must_use]
    pub fn headless(mut self) -> Self {
        self.options = self.options.with_headless();
        self
    }

    /// Builds the driver with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::BrowserNotFound`] if the binary doesn't exist or none was found on `PATH`
    /// - [`Error::Config`] if the options are invalid
    pub fn build(self) -> Result<Driver> {
        let binary = self.validate_binary()?;
        self.options.validate().map_err(Error::config)?;

        Ok(Driver::new(binary, self.options))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl DriverBuilder {
    /// Resolves and validates the binary path configuration.
    fn validate_binary(&self) -> Result<PathBuf> {
        let binary = match &self.binary {
            Some(path) => path.clone(),
            None => detect_binary()?,
        };

        if !binary.exists() {
            return Err(Error::browser_not_found(&binary));
        }

        Ok(binary)
    }
}

/// Searches `PATH` for the first known Chromium-family executable.
///
/// # Errors
///
/// Returns [`Error::BrowserNotFound`] if none of [`BINARY_CANDIDATES`] is installed.
pub fn detect_binary() -> Result<PathBuf> {
    BINARY_CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
        .inspect(|path| debug!(path = %path.display(), "Detected browser binary"))
        .ok_or_else(|| Error::browser_not_found(BINARY_CANDIDATES.join(" | ")))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_empty_builder() {
        let builder = DriverBuilder::new();
        assert!(builder.binary.is_none());
        assert_eq!(builder.options, BrowserOptions::default());
    }

    #[test]
    fn test_binary_sets_path() {
        let builder = DriverBuilder::new().binary("/usr/bin/chromium");
        assert_eq!(builder.binary, Some(PathBuf::from("/usr/bin/chromium")));
    }

    #[test]
    fn test_headless_sets_option() {
        let builder = DriverBuilder::new().headless();
        assert!(builder.options.is_headless());
    }

    #[test]
    fn test_build_fails_with_nonexistent_binary() {
        let err = DriverBuilder::new()
            .binary("/nonexistent/chromium")
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::BrowserNotFound { .. }));
    }

    #[test]
    fn test_build_fails_with_invalid_options() {
        let err = DriverBuilder::new()
            .binary("/bin/sh")
            .options(BrowserOptions::new().with_window_size(0, 0))
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_build_with_existing_binary() {
        let driver = DriverBuilder::new().binary("/bin/sh").build();
        assert!(driver.is_ok());
    }

    #[test]
    fn test_builder_is_clone() {
        let builder = DriverBuilder::new().binary("/usr/bin/chromium");
        let cloned = builder.clone();
        assert_eq!(builder.binary, cloned.binary);
    }
}
