//! Reply extraction.
//!
//! There is no signal for "the reply is complete", so extraction waits a
//! fixed settle delay, then reads the first response candidate with
//! non-empty text. When none has any, the trailing lines of the page's
//! visible text stand in for the reply.

// ============================================================================
// Imports
// ============================================================================

use std::slice;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::lookup::ChatPage;
use super::selector::{SelectorCandidate, resolve};

// ============================================================================
// ExtractionResult
// ============================================================================

/// Where the reply text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    /// Text of a response candidate.
    Structured {
        /// Index of the candidate that yielded the text.
        index: usize,
        /// Reply text, verbatim.
        text: String,
    },

    /// Trailing lines of the page body.
    Fallback(String),

    /// Nothing could be read.
    Empty,
}

impl ExtractionResult {
    /// Returns the reply text (empty for [`ExtractionResult::Empty`]).
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Structured { text, .. } | Self::Fallback(text) => text,
            Self::Empty => "",
        }
    }

    /// Consumes the result and returns the reply text.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Structured { text, .. } | Self::Fallback(text) => text,
            Self::Empty => String::new(),
        }
    }

    /// Returns a short label for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Structured { .. } => "structured",
            Self::Fallback(_) => "fallback",
            Self::Empty => "empty",
        }
    }
}

/// Selector chain and timing used by [`extract`].
#[derive(Debug, Clone, Copy)]
pub struct ExtractionPlan<'a> {
    /// Wait before reading anything.
    pub settle: Duration,

    /// Candidates for the last assistant message.
    pub response_chain: &'a [SelectorCandidate],

    /// Trailing body lines used as the fallback.
    pub fallback_lines: usize,
}

// ============================================================================
// extract
// ============================================================================

/// Waits for the reply to render and reads it. Never fails.
pub async fn extract<P>(page: &P, plan: ExtractionPlan<'_>) -> ExtractionResult
where
    P: ChatPage + ?Sized,
{
    debug!(settle_ms = plan.settle.as_millis() as u64, "Waiting for reply to render");
    tokio::time::sleep(plan.settle).await;

    for (index, candidate) in plan.response_chain.iter().enumerate() {
        let Some(found) = resolve(slice::from_ref(candidate), page).await else {
            continue;
        };

        match page.inner_text(&found.element).await {
            Ok(text) if !text.is_empty() => {
                info!(candidate = index, chars = text.chars().count(), "Reply extracted");
                return ExtractionResult::Structured { index, text };
            }
            Ok(_) => debug!(candidate = index, "Response candidate has no text"),
            Err(e) => debug!(candidate = index, error = %e, "Reading response candidate failed"),
        }
    }

    let body = match page.body_text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Reading page text failed; reply is empty");
            return ExtractionResult::Empty;
        }
    };

    let tail = fallback_tail(&body, plan.fallback_lines);
    if tail.is_empty() {
        warn!("Page has no visible text; reply is empty");
        ExtractionResult::Empty
    } else {
        warn!(lines = plan.fallback_lines, "No response candidate had text; using page text tail");
        ExtractionResult::Fallback(tail)
    }
}

/// Returns the last `lines` lines of `text`, split on `\n`, rejoined with `\n`.
#[must_use]
pub fn fallback_tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.split('\n').collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use tokio::time::Instant;

    use crate::chat::testing::{FakePage, Probe};

    fn chain(selectors: &[&str]) -> Vec<SelectorCandidate> {
        selectors
            .iter()
            .map(|s| SelectorCandidate::immediate(*s))
            .collect()
    }

    fn plan(chain: &[SelectorCandidate]) -> ExtractionPlan<'_> {
        ExtractionPlan {
            settle: Duration::from_secs(5),
            response_chain: chain,
            fallback_lines: 10,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_non_empty_candidate_wins() {
        let page = FakePage::new()
            .with_element("div.a", Probe::Present(""))
            .with_element("div.b", Probe::Present("추천드릴게요"))
            .with_element("div.c", Probe::Present("later"));
        let chain = chain(&["div.missing", "div.a", "div.b", "div.c"]);

        let result = extract(&page, plan(&chain)).await;

        assert_eq!(
            result,
            ExtractionResult::Structured {
                index: 2,
                text: "추천드릴게요".to_string(),
            }
        );
        assert!(!page.lookups().contains(&"div.c".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_settle_delay_first() {
        let page = FakePage::new().with_element("div.reply", Probe::Present("hi"));
        let chain = chain(&["div.reply"]);

        let started = Instant::now();
        extract(&page, plan(&chain)).await;

        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_falls_back_to_last_ten_lines() {
        let body = (1..=15).map(|n| format!("line {n}")).collect::<Vec<_>>().join("\n");
        let page = FakePage::new()
            .with_element("div.reply", Probe::Present(""))
            .with_body(&body);
        let chain = chain(&["div.reply"]);

        let result = extract(&page, plan(&chain)).await;

        let expected = (6..=15).map(|n| format!("line {n}")).collect::<Vec<_>>().join("\n");
        assert_eq!(result, ExtractionResult::Fallback(expected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_whitespace_reply_is_kept_verbatim() {
        let page = FakePage::new()
            .with_element("div.reply", Probe::Present("\n"))
            .with_body("a\nb\nc");
        let chain = chain(&["div.reply"]);

        let result = extract(&page, plan(&chain)).await;

        assert_eq!(
            result,
            ExtractionResult::Structured {
                index: 0,
                text: "\n".to_string(),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_whitespace_body_is_returned_as_tail() {
        let page = FakePage::new().with_body("  \n  ");
        let result = extract(&page, plan(&[])).await;

        assert_eq!(result, ExtractionResult::Fallback("  \n  ".to_string()));
        assert_eq!(result.text(), "  \n  ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_when_nothing_readable() {
        let page = FakePage::new().with_body("");
        let result = extract(&page, plan(&[])).await;

        assert_eq!(result, ExtractionResult::Empty);
        assert_eq!(result.text(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_body_error_is_empty_not_failure() {
        let page = FakePage::new().with_body_failure();
        let result = extract(&page, plan(&[])).await;
        assert_eq!(result, ExtractionResult::Empty);
    }

    #[test]
    fn test_fallback_tail_short_text() {
        assert_eq!(fallback_tail("a\nb", 10), "a\nb");
        assert_eq!(fallback_tail("", 10), "");
        assert_eq!(fallback_tail("a\nb\nc\n", 2), "c\n");
    }

    proptest! {
        #[test]
        fn prop_fallback_tail_is_suffix(text in "[a-z가-힣 \n]{0,200}", lines in 1usize..20) {
            let tail = fallback_tail(&text, lines);
            prop_assert!(text.ends_with(&tail));
            prop_assert!(tail.split('\n').count() <= lines);
        }

        #[test]
        fn prop_fallback_tail_keeps_everything_when_short(lines in 1usize..20) {
            let text = vec!["x"; lines].join("\n");
            prop_assert_eq!(fallback_tail(&text, lines), text);
        }
    }
}
