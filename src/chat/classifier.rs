//! Conversation state classification.
//!
//! A deliberately coarse heuristic: a reply either recommends something or
//! is still gathering information. The [`StateClassifier`] trait keeps the
//! heuristic swappable without touching the flow.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::config::DEFAULT_RECOMMENDATION_KEYWORD;

// ============================================================================
// ConversationState
// ============================================================================

/// Where the dialogue is in the two-phase model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationState {
    /// Still collecting information from the user.
    Gathering,

    /// Offering recommendations.
    Recommending,
}

impl ConversationState {
    /// Returns the wire name.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gathering => "GATHERING",
            Self::Recommending => "RECOMMENDING",
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// StateClassifier
// ============================================================================

/// Maps reply text to a [`ConversationState`]. Must be pure.
pub trait StateClassifier: Send + Sync {
    /// Classifies `reply`.
    fn classify(&self, reply: &str) -> ConversationState;
}

impl<F> StateClassifier for F
where
    F: Fn(&str) -> ConversationState + Send + Sync,
{
    fn classify(&self, reply: &str) -> ConversationState {
        self(reply)
    }
}

// ============================================================================
// KeywordClassifier
// ============================================================================

/// `Recommending` when the reply contains a keyword, `Gathering` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordClassifier {
    keyword: String,
}

impl KeywordClassifier {
    /// Creates a classifier for `keyword`.
    #[inline]
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
        }
    }

    /// Returns the keyword.
    #[inline]
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_RECOMMENDATION_KEYWORD)
    }
}

impl StateClassifier for KeywordClassifier {
    fn classify(&self, reply: &str) -> ConversationState {
        if reply.contains(&self.keyword) {
            ConversationState::Recommending
        } else {
            ConversationState::Gathering
        }
    }
}

// ============================================================================
// PatternClassifier
// ============================================================================

/// `Recommending` when the reply matches a regular expression.
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    pattern: Regex,
}

impl PatternClassifier {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns the regex error if `pattern` is invalid.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl StateClassifier for PatternClassifier {
    fn classify(&self, reply: &str) -> ConversationState {
        if self.pattern.is_match(reply) {
            ConversationState::Recommending
        } else {
            ConversationState::Gathering
        }
    }
}

/// Classifies with the default keyword.
#[must_use]
pub fn classify(reply: &str) -> ConversationState {
    KeywordClassifier::default().classify(reply)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_keyword_means_recommending() {
        assert_eq!(classify("추천해 드릴게요"), ConversationState::Recommending);
    }

    #[test]
    fn test_no_keyword_means_gathering() {
        assert_eq!(classify("조금 더 알려주세요"), ConversationState::Gathering);
        assert_eq!(classify(""), ConversationState::Gathering);
    }

    #[test]
    fn test_custom_keyword() {
        let classifier = KeywordClassifier::new("recommend");
        assert_eq!(classifier.keyword(), "recommend");
        assert_eq!(
            classifier.classify("I recommend the blue one"),
            ConversationState::Recommending
        );
        assert_eq!(classifier.classify("추천"), ConversationState::Gathering);
    }

    #[test]
    fn test_pattern_classifier() {
        let classifier = PatternClassifier::new(r"(?i)\brecommend(ation)?s?\b|추천").expect("valid");
        assert_eq!(
            classifier.classify("Top Recommendations:"),
            ConversationState::Recommending
        );
        assert_eq!(classifier.classify("tell me more"), ConversationState::Gathering);
        assert!(PatternClassifier::new("(").is_err());
    }

    #[test]
    fn test_closure_classifier() {
        let always = |_: &str| ConversationState::Recommending;
        assert_eq!(always.classify("anything"), ConversationState::Recommending);
    }

    #[test]
    fn test_state_wire_names() {
        assert_eq!(
            serde_json::to_string(&ConversationState::Gathering).expect("serialize"),
            "\"GATHERING\""
        );
        assert_eq!(ConversationState::Recommending.to_string(), "RECOMMENDING");
    }

    proptest! {
        #[test]
        fn prop_keyword_anywhere_is_recommending(prefix in "\\PC{0,40}", suffix in "\\PC{0,40}") {
            let reply = format!("{prefix}추천{suffix}");
            prop_assert_eq!(classify(&reply), ConversationState::Recommending);
        }

        #[test]
        fn prop_text_without_keyword_is_gathering(reply in "[a-zA-Z0-9 .,!?\n]{0,80}") {
            prop_assert_eq!(classify(&reply), ConversationState::Gathering);
        }
    }
}
