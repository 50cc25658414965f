//! Chat round-trip layer.
//!
//! Built on the capability traits in [`lookup`], so everything here runs
//! against a real [`Page`](crate::browser::Page) or an in-memory fake.
//!
//! | Module | Role |
//! |--------|------|
//! | [`selector`] | Ordered fallback locators per control |
//! | [`session`] | Acquire, navigate and release one browser session |
//! | [`dispatcher`] | Fill the input, click submit |
//! | [`extractor`] | Read the reply, with a page-text fallback |
//! | [`classifier`] | `GATHERING` / `RECOMMENDING` heuristic |
//! | [`payload`] | The single JSON result line |
//! | [`flow`] | Orchestration ([`ChatRelay`]) |

// ============================================================================
// Modules
// ============================================================================

pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod extractor;
pub mod flow;
pub mod lookup;
pub mod payload;
pub mod selector;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use classifier::{
    ConversationState, KeywordClassifier, PatternClassifier, StateClassifier, classify,
};
pub use config::ChatConfig;
pub use dispatcher::{Dispatch, DispatchPlan, send};
pub use extractor::{ExtractionPlan, ExtractionResult, extract, fallback_tail};
pub use flow::{ChatRelay, FlowStage, Reply};
pub use lookup::{ChatPage, ElementLookup};
pub use payload::ResultPayload;
pub use selector::{IMMEDIATE_CHECK_BUDGET, Resolved, SelectorCandidate, resolve};
pub use session::{BrowserSession, ChatSession, SessionProvider, with_session};

// ============================================================================
// FlowError
// ============================================================================

use thiserror::Error;

use crate::error::Error;

/// Failure of one round trip, by the step that failed.
///
/// Every variant ends the round trip in a failure payload.
#[derive(Error, Debug)]
pub enum FlowError {
    /// Launching the browser, opening the page, or loading the chat URL failed.
    #[error("Failed to open chat session: {0}")]
    Acquisition(#[source] Error),

    /// The message was empty.
    #[error("Message is empty")]
    EmptyMessage,

    /// No message input candidate resolved.
    #[error("Message input not found after trying {tried} selectors")]
    InputNotFound {
        /// Number of candidates tried.
        tried: usize,
    },

    /// Entering the message failed.
    #[error("Failed to enter message: {0}")]
    Dispatch(#[source] Error),
}

impl FlowError {
    /// Returns the underlying browser error, if any.
    #[must_use]
    pub fn browser_error(&self) -> Option<&Error> {
        match self {
            Self::Acquisition(e) | Self::Dispatch(e) => Some(e),
            Self::EmptyMessage | Self::InputNotFound { .. } => None,
        }
    }

    /// Returns `true` if the failure was a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.browser_error().is_some_and(Error::is_timeout)
    }
}
