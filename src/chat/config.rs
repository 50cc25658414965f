//! Chat flow configuration.
//!
//! Every timing and selector the flow uses lives here, with defaults tuned
//! for the claude.ai web UI.
//!
//! # Example
//!
//! ```ignore
//! use webchat_relay::ChatConfig;
//!
//! let config = ChatConfig::new()
//!     .with_url("https://claude.ai/new")
//!     .with_reply_settle(Duration::from_secs(8))
//!     .with_fallback_lines(20);
//!
//! config.validate()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::browser::By;
use crate::error::{Error, Result};

use super::selector::SelectorCandidate;

// ============================================================================
// Constants
// ============================================================================

/// Default chat page.
pub const DEFAULT_URL: &str = "https://claude.ai/new";

/// Default keyword marking a recommending reply.
pub const DEFAULT_RECOMMENDATION_KEYWORD: &str = "추천";

/// Default user-facing apology; `{error}` is replaced by the error text.
pub const DEFAULT_APOLOGY_TEMPLATE: &str =
    "죄송합니다. Claude.ai 연결에 문제가 발생했습니다: {error}";

/// Placeholder substituted in the apology template.
pub const ERROR_PLACEHOLDER: &str = "{error}";

// ============================================================================
// ChatConfig
// ============================================================================

/// Configuration for one chat round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Chat page to open.
    pub url: String,

    /// Upper bound on navigation, including the network-idle wait.
    #[serde(rename = "navigation_timeout_ms", with = "duration_ms")]
    pub navigation_timeout: Duration,

    /// Pause after navigation before looking for the input.
    #[serde(rename = "post_navigation_pause_ms", with = "duration_ms")]
    pub post_navigation_pause: Duration,

    /// Candidates for the message input.
    pub input_chain: Vec<SelectorCandidate>,

    /// Pause after filling the input, before submitting.
    #[serde(rename = "input_settle_ms", with = "duration_ms")]
    pub input_settle: Duration,

    /// Candidates for the submit control.
    pub submit_chain: Vec<SelectorCandidate>,

    /// Wait between submitting and reading the reply.
    #[serde(rename = "reply_settle_ms", with = "duration_ms")]
    pub reply_settle: Duration,

    /// Candidates for the last assistant message.
    pub response_chain: Vec<SelectorCandidate>,

    /// Number of trailing body lines used when no candidate yields text.
    pub fallback_lines: usize,

    /// Substring marking a recommending reply.
    pub recommendation_keyword: String,

    /// User-facing failure message; `{error}` is replaced by the error text.
    pub apology_template: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        let input_wait = Duration::from_secs(5);
        let submit_wait = Duration::from_secs(3);

        Self {
            url: DEFAULT_URL.to_string(),
            navigation_timeout: Duration::from_secs(30),
            post_navigation_pause: Duration::from_secs(2),
            input_chain: vec![
                SelectorCandidate::visible(
                    r#"div[contenteditable="true"][data-placeholder]"#,
                    input_wait,
                ),
                SelectorCandidate::visible(r#"div[contenteditable="true"]"#, input_wait),
                SelectorCandidate::visible(r#"textarea[placeholder*="Message"]"#, input_wait),
                SelectorCandidate::visible("div.ProseMirror", input_wait),
            ],
            input_settle: Duration::from_millis(500),
            submit_chain: vec![
                SelectorCandidate::visible(r#"button[aria-label*="Send"]"#, submit_wait),
                SelectorCandidate::visible(By::has_text("button", "Send"), submit_wait),
                SelectorCandidate::visible(r#"button[type="submit"]"#, submit_wait),
            ],
            reply_settle: Duration::from_secs(5),
            response_chain: vec![
                SelectorCandidate::immediate(r#"div[data-testid="user-message"] ~ div:last-child"#),
                SelectorCandidate::immediate("div.font-claude-message:last-child"),
                SelectorCandidate::immediate("div.whitespace-pre-wrap:last-child"),
            ],
            fallback_lines: 10,
            recommendation_keyword: DEFAULT_RECOMMENDATION_KEYWORD.to_string(),
            apology_template: DEFAULT_APOLOGY_TEMPLATE.to_string(),
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl ChatConfig {
    /// Creates a configuration with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;

        let config = Self::from_json(&raw)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;

        debug!(path = %path.display(), "Loaded chat configuration");
        Ok(config)
    }

    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if the text is malformed.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ChatConfig {
    /// Sets the chat page URL.
    #[inline]
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the navigation timeout.
    #[inline]
    #[must_use]
    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Sets the pause after navigation.
    #[inline]
    #[must_use]
    pub fn with_post_navigation_pause(mut self, pause: Duration) -> Self {
        self.post_navigation_pause = pause;
        self
    }

    /// Replaces the input selector chain.
    #[inline]
    #[must_use]
    pub fn with_input_chain(mut self, chain: Vec<SelectorCandidate>) -> Self {
        self.input_chain = chain;
        self
    }

    /// Sets the pause between filling and submitting.
    #[inline]
    #[must_use]
    pub fn with_input_settle(mut self, settle: Duration) -> Self {
        self.input_settle = settle;
        self
    }

    /// Replaces the submit selector chain.
    #[inline]
    #[must_use]
    pub fn with_submit_chain(mut self, chain: Vec<SelectorCandidate>) -> Self {
        self.submit_chain = chain;
        self
    }

    /// Sets the wait before reading the reply.
    #[inline]
    #[must_use]
    pub fn with_reply_settle(mut self, settle: Duration) -> Self {
        self.reply_settle = settle;
        self
    }

    /// Replaces the response selector chain.
    #[inline]
    #[must_use]
    pub fn with_response_chain(mut self, chain: Vec<SelectorCandidate>) -> Self {
        self.response_chain = chain;
        self
    }

    /// Sets the number of trailing body lines used as a fallback reply.
    #[inline]
    #[must_use]
    pub fn with_fallback_lines(mut self, lines: usize) -> Self {
        self.fallback_lines = lines;
        self
    }

    /// Sets the keyword marking a recommending reply.
    #[inline]
    #[must_use]
    pub fn with_recommendation_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.recommendation_keyword = keyword.into();
        self
    }

    /// Sets the apology template.
    #[inline]
    #[must_use]
    pub fn with_apology_template(mut self, template: impl Into<String>) -> Self {
        self.apology_template = template.into();
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl ChatConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.url)
            .map_err(|e| Error::config(format!("Invalid chat URL {:?}: {e}", self.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "Chat URL must be http(s), got {}",
                url.scheme()
            )));
        }

        if self.input_chain.is_empty() {
            return Err(Error::config("Input selector chain is empty"));
        }

        if self.submit_chain.is_empty() {
            return Err(Error::config("Submit selector chain is empty"));
        }

        if self.fallback_lines == 0 {
            return Err(Error::config("Fallback window must be at least one line"));
        }

        if self.recommendation_keyword.is_empty() {
            return Err(Error::config("Recommendation keyword is empty"));
        }

        if self.navigation_timeout.is_zero() {
            return Err(Error::config("Navigation timeout must be non-zero"));
        }

        Ok(())
    }

    /// Renders the apology message for an error description.
    #[must_use]
    pub fn apology(&self, error: &str) -> String {
        self.apology_template.replace(ERROR_PLACEHOLDER, error)
    }
}

// ============================================================================
// Serde Helpers
// ============================================================================

/// Serializes a [`Duration`] as integer milliseconds.
pub(crate) mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let ms = u64::deserialize(d)?;
        Ok(Duration::from_millis(ms))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::browser::WaitState;

    #[test]
    fn test_defaults_match_reference_flow() {
        let config = ChatConfig::default();

        assert_eq!(config.url, "https://claude.ai/new");
        assert_eq!(config.navigation_timeout, Duration::from_secs(30));
        assert_eq!(config.post_navigation_pause, Duration::from_secs(2));
        assert_eq!(config.input_chain.len(), 4);
        assert!(config.input_chain.iter().all(|c| c.timeout == Duration::from_secs(5)));
        assert_eq!(config.input_settle, Duration::from_millis(500));
        assert_eq!(config.submit_chain.len(), 3);
        assert_eq!(config.submit_chain[1].by, By::has_text("button", "Send"));
        assert_eq!(config.reply_settle, Duration::from_secs(5));
        assert!(config.response_chain.iter().all(|c| c.state == WaitState::Attached));
        assert_eq!(config.fallback_lines, 10);
        assert_eq!(config.recommendation_keyword, "추천");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = ChatConfig::new()
            .with_url("http://localhost:3000/chat")
            .with_reply_settle(Duration::from_secs(1))
            .with_fallback_lines(3)
            .with_recommendation_keyword("recommend");

        assert_eq!(config.url, "http://localhost:3000/chat");
        assert_eq!(config.reply_settle, Duration::from_secs(1));
        assert_eq!(config.fallback_lines, 3);
        assert_eq!(config.recommendation_keyword, "recommend");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ChatConfig::new().with_url("not a url").validate().is_err());
        assert!(ChatConfig::new().with_url("ftp://example.com").validate().is_err());
        assert!(ChatConfig::new().with_input_chain(vec![]).validate().is_err());
        assert!(ChatConfig::new().with_submit_chain(vec![]).validate().is_err());
        assert!(ChatConfig::new().with_fallback_lines(0).validate().is_err());
        assert!(ChatConfig::new().with_recommendation_keyword("").validate().is_err());
        assert!(
            ChatConfig::new()
                .with_navigation_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_empty_response_chain_is_allowed() {
        let config = ChatConfig::new().with_response_chain(vec![]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apology_embeds_error() {
        let config = ChatConfig::default();
        assert_eq!(
            config.apology("timeout"),
            "죄송합니다. Claude.ai 연결에 문제가 발생했습니다: timeout"
        );
    }

    #[test]
    fn test_from_json_partial_keeps_defaults() {
        let config = ChatConfig::from_json(
            r#"{"url": "https://chat.example.com", "reply_settle_ms": 8000}"#,
        )
        .expect("parse");

        assert_eq!(config.url, "https://chat.example.com");
        assert_eq!(config.reply_settle, Duration::from_secs(8));
        assert_eq!(config.input_chain, ChatConfig::default().input_chain);
    }

    #[test]
    fn test_json_roundtrip_preserves_chains() {
        let config = ChatConfig::default();
        let json = serde_json::to_string(&config).expect("serialize");
        assert!(json.contains("\"navigation_timeout_ms\":30000"));

        let parsed = ChatConfig::from_json(&json).expect("parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_from_file_missing() {
        let err = ChatConfig::from_file("/nonexistent/chat.json").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_from_file_reads_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chat.json");
        std::fs::write(&path, r#"{"fallback_lines": 4}"#).expect("write");

        let config = ChatConfig::from_file(&path).expect("load");
        assert_eq!(config.fallback_lines, 4);
    }
}
