//! Browser command-line options and configuration.
//!
//! Provides a type-safe interface for configuring browser process options
//! such as headless mode, window size, and UI language.
//!
//! # Example
//!
//! ```ignore
//! use webchat_relay::BrowserOptions;
//!
//! let options = BrowserOptions::new()
//!     .with_headless()
//!     .with_window_size(1280, 900)
//!     .with_lang("ko-KR");
//!
//! let args = options.to_args();
//! // ["--headless=new", "--window-size=1280,900", "--lang=ko-KR"]
//! ```

use std::time::Duration;

// ============================================================================
// BrowserOptions
// ============================================================================

/// Browser process configuration options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserOptions {
    /// Run without a visible window.
    pub headless: bool,

    /// Window dimensions in pixels (width, height).
    pub window_size: Option<(u32, u32)>,

    /// UI language (e.g. `ko-KR`).
    pub lang: Option<String>,

    /// Delay inserted before every page action.
    pub slow_mo: Option<Duration>,

    /// Additional custom command-line arguments.
    pub extra_args: Vec<String>,
}

// ============================================================================
// Constructors
// ============================================================================

impl BrowserOptions {
    /// Creates a new options instance with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            headless: false,
            window_size: None,
            lang: None,
            slow_mo: None,
            extra_args: Vec::new(),
        }
    }

    /// Creates options configured for headless mode.
    #[inline]
    #[must_use]
    pub fn headless() -> Self {
        Self {
            headless: true,
            ..Default::default()
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl BrowserOptions {
    /// Enables headless mode.
    #[inline]
    #[must_use]
    pub fn with_headless(mut self) -> Self {
        self.headless = true;
        self
    }

    /// Sets window size in pixels.
    #[inline]
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = Some((width, height));
        self
    }

    /// Sets the UI language.
    #[inline]
    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Slows every page action down by `delay`.
    #[inline]
    #[must_use]
    pub fn with_slow_mo(mut self, delay: Duration) -> Self {
        self.slow_mo = Some(delay);
        self
    }

    /// Adds a custom command-line argument.
    #[inline]
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Adds multiple custom command-line arguments.
    #[inline]
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }
}

// ============================================================================
// Conversion Methods
// ============================================================================

impl BrowserOptions {
    /// Converts options to browser command-line arguments.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(4 + self.extra_args.len());

        if self.headless {
            args.push("--headless=new".to_string());
        }

        if let Some((width, height)) = self.window_size {
            args.push(format!("--window-size={width},{height}"));
        }

        if let Some(lang) = &self.lang {
            args.push(format!("--lang={lang}"));
        }

        args.extend(self.extra_args.clone());
        args
    }

    /// Validates the options configuration.
    ///
    /// # Errors
    ///
    /// Returns error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if let Some((width, height)) = self.window_size
            && (width == 0 || height == 0)
        {
            return Err("Window dimensions must be greater than zero".to_string());
        }

        if self
            .extra_args
            .iter()
            .any(|arg| arg.starts_with("--remote-debugging-port") || arg.starts_with("--user-data-dir"))
        {
            return Err(
                "--remote-debugging-port and --user-data-dir are managed by the driver".to_string(),
            );
        }

        Ok(())
    }

    /// Returns `true` if headless mode is enabled.
    #[inline]
    #[must_use]
    pub const fn is_headless(&self) -> bool {
        self.headless
    }
}

// ============================================================================
// Tests
// ============================================================================
