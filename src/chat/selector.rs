//! Selector chain resolution.
//!
//! A selector chain is an ordered list of alternative ways to locate one
//! logical control. Chat UIs reshuffle their markup between releases, so
//! each control is described by several plausible locators tried in turn.
//!
//! # Example
//!
//! ```ignore
//! use webchat_relay::chat::{SelectorCandidate, resolve};
//!
//! let chain = [
//!     SelectorCandidate::visible(By::css("textarea"), Duration::from_secs(5)),
//!     SelectorCandidate::visible(By::css("div.ProseMirror"), Duration::from_secs(5)),
//! ];
//!
//! if let Some(found) = resolve(&chain, &page).await {
//!     println!("matched candidate #{}", found.index);
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::browser::{By, WaitState};

use super::config::duration_ms;
use super::lookup::ElementLookup;

// ============================================================================
// Constants
// ============================================================================

/// Time budget for a candidate whose timeout is zero.
///
/// A zero timeout means "check once, don't wait", which still costs one
/// round trip to the page.
pub const IMMEDIATE_CHECK_BUDGET: Duration = Duration::from_secs(2);

// ============================================================================
// SelectorCandidate
// ============================================================================

/// One way to locate an element, with its own wait budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorCandidate {
    /// Locator strategy and value.
    pub by: By,

    /// State the element must reach.
    #[serde(default)]
    pub state: WaitState,

    /// Maximum wait for this candidate (milliseconds on the wire).
    #[serde(rename = "timeout_ms", with = "duration_ms")]
    pub timeout: Duration,
}

impl SelectorCandidate {
    /// Creates a candidate.
    #[inline]
    #[must_use]
    pub fn new(by: impl Into<By>, state: WaitState, timeout: Duration) -> Self {
        Self {
            by: by.into(),
            state,
            timeout,
        }
    }

    /// Creates a candidate that must be visible.
    #[inline]
    #[must_use]
    pub fn visible(by: impl Into<By>, timeout: Duration) -> Self {
        Self::new(by, WaitState::Visible, timeout)
    }

    /// Creates a candidate checked once for presence, without waiting.
    #[inline]
    #[must_use]
    pub fn immediate(by: impl Into<By>) -> Self {
        Self::new(by, WaitState::Attached, Duration::ZERO)
    }

    /// Returns the wall-clock budget the resolver grants this candidate.
    #[inline]
    #[must_use]
    pub fn budget(&self) -> Duration {
        if self.timeout.is_zero() {
            IMMEDIATE_CHECK_BUDGET
        } else {
            self.timeout
        }
    }
}

// ============================================================================
// Resolved
// ============================================================================

/// A successful resolution: the element and which candidate produced it.
#[derive(Debug, Clone)]
pub struct Resolved<H> {
    /// Position of the winning candidate in the chain.
    pub index: usize,

    /// The located element.
    pub element: H,
}

// ============================================================================
// Resolver
// ============================================================================

/// Returns the first candidate's element that resolves within its budget.
///
/// Candidates are tried strictly in order; once one resolves, later
/// candidates are never attempted. A lookup error counts as a miss for that
/// candidate. `None` means the whole chain was exhausted, and the caller
/// decides whether that is fatal.
///
/// Total time is bounded by the sum of [`SelectorCandidate::budget`]s.
pub async fn resolve<L>(chain: &[SelectorCandidate], lookup: &L) -> Option<Resolved<L::Handle>>
where
    L: ElementLookup + ?Sized,
{
    for (index, candidate) in chain.iter().enumerate() {
        let attempt = lookup.wait_for(&candidate.by, candidate.state, candidate.timeout);

        match timeout(candidate.budget(), attempt).await {
            Ok(Ok(Some(element))) => {
                debug!(index, locator = %candidate.by, "Selector resolved");
                return Some(Resolved { index, element });
            }
            Ok(Ok(None)) => {
                debug!(index, locator = %candidate.by, "Selector did not resolve");
            }
            Ok(Err(e)) => {
                warn!(index, locator = %candidate.by, error = %e, "Selector lookup failed");
            }
            Err(_) => {
                debug!(
                    index,
                    locator = %candidate.by,
                    budget_ms = candidate.budget().as_millis() as u64,
                    "Selector wait exceeded its budget"
                );
            }
        }
    }

    debug!(candidates = chain.len(), "Selector chain exhausted");
    None
}

// ============================================================================
// Tests
// ============================================================================
