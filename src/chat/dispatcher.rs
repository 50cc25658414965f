//! Message dispatch.
//!
//! Fills the first input control that resolves, lets the page settle, then
//! clicks the first submit control that resolves. A missing submit control
//! does not fail the dispatch; it is reported through
//! [`Dispatch::submitted`] so callers can see the message never left.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tracing::{debug, info, warn};

use super::FlowError;
use super::lookup::ChatPage;
use super::selector::{SelectorCandidate, resolve};

// ============================================================================
// Types
// ============================================================================

/// Outcome of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// Index of the input candidate that resolved.
    pub input_index: usize,

    /// Index of the submit candidate that was clicked, if any.
    pub submit_index: Option<usize>,

    /// `true` if a submit control was clicked.
    pub submitted: bool,
}

/// Selector chains and timing used by [`send`].
#[derive(Debug, Clone, Copy)]
pub struct DispatchPlan<'a> {
    /// Candidates for the message input.
    pub input_chain: &'a [SelectorCandidate],

    /// Pause between filling and submitting.
    pub input_settle: Duration,

    /// Candidates for the submit control.
    pub submit_chain: &'a [SelectorCandidate],
}

// ============================================================================
// send
// ============================================================================

/// Types `message` into the page and submits it.
///
/// Each call performs its own fill and submit; nothing is deduplicated.
/// When a resolved submit control fails to click, the remaining submit
/// candidates are tried in order.
///
/// # Errors
///
/// - [`FlowError::EmptyMessage`] if `message` is empty
/// - [`FlowError::InputNotFound`] if no input candidate resolves
/// - [`FlowError::Dispatch`] if filling the input fails
pub async fn send<P>(
    page: &P,
    message: &str,
    plan: DispatchPlan<'_>,
) -> Result<Dispatch, FlowError>
where
    P: ChatPage + ?Sized,
{
    if message.is_empty() {
        return Err(FlowError::EmptyMessage);
    }

    let input = resolve(plan.input_chain, page)
        .await
        .ok_or(FlowError::InputNotFound {
            tried: plan.input_chain.len(),
        })?;
    info!(candidate = input.index, "Message input resolved");

    page.fill(&input.element, message)
        .await
        .map_err(FlowError::Dispatch)?;
    debug!(chars = message.chars().count(), "Message entered");

    tokio::time::sleep(plan.input_settle).await;

    let submit_index = click_submit(page, plan.submit_chain).await;
    match submit_index {
        Some(index) => info!(candidate = index, "Message submitted"),
        None => warn!(
            candidates = plan.submit_chain.len(),
            "No submit control resolved; message was entered but not submitted"
        ),
    }

    Ok(Dispatch {
        input_index: input.index,
        submit_index,
        submitted: submit_index.is_some(),
    })
}

/// Clicks the first submit candidate that resolves and accepts the click.
async fn click_submit<P>(page: &P, chain: &[SelectorCandidate]) -> Option<usize>
where
    P: ChatPage + ?Sized,
{
    let mut offset = 0;

    while offset < chain.len() {
        let found = resolve(&chain[offset..], page).await?;
        let index = offset + found.index;

        match page.click(&found.element).await {
            Ok(()) => return Some(index),
            Err(e) => {
                warn!(candidate = index, error = %e, "Submit click failed");
                offset = index + 1;
            }
        }
    }

    None
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::chat::testing::{FakePage, Probe};

    fn chain(selectors: &[&str]) -> Vec<SelectorCandidate> {
        selectors
            .iter()
            .map(|s| SelectorCandidate::visible(*s, Duration::from_millis(50)))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_fills_then_submits() {
        let page = FakePage::new()
            .with_element("textarea", Probe::Present(""))
            .with_element("button.send", Probe::Present(""));

        let input = chain(&["div.missing", "textarea"]);
        let submit = chain(&["button.send"]);
        let plan = DispatchPlan {
            input_chain: &input,
            input_settle: Duration::from_millis(500),
            submit_chain: &submit,
        };

        let dispatch = send(&page, "안녕하세요", plan).await.expect("dispatch");

        assert_eq!(
            dispatch,
            Dispatch {
                input_index: 1,
                submit_index: Some(0),
                submitted: true,
            }
        );
        assert_eq!(page.filled(), vec![("textarea".to_string(), "안녕하세요".to_string())]);
        assert_eq!(page.clicked(), vec!["button.send"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_input_is_fatal() {
        let page = FakePage::new();
        let input = chain(&["a", "b", "c"]);
        let submit = chain(&["button"]);
        let plan = DispatchPlan {
            input_chain: &input,
            input_settle: Duration::ZERO,
            submit_chain: &submit,
        };

        let err = send(&page, "hi", plan).await.unwrap_err();

        assert!(matches!(err, FlowError::InputNotFound { tried: 3 }));
        assert!(page.filled().is_empty());
        assert!(page.clicked().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_submit_is_reported_not_fatal() {
        let page = FakePage::new().with_element("textarea", Probe::Present(""));
        let input = chain(&["textarea"]);
        let submit = chain(&["button.send", "button[type=submit]"]);
        let plan = DispatchPlan {
            input_chain: &input,
            input_settle: Duration::ZERO,
            submit_chain: &submit,
        };

        let dispatch = send(&page, "hi", plan).await.expect("dispatch");

        assert!(!dispatch.submitted);
        assert_eq!(dispatch.submit_index, None);
        assert_eq!(page.filled().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_click_moves_to_next_submit_candidate() {
        let page = FakePage::new()
            .with_element("textarea", Probe::Present(""))
            .with_element("button.stale", Probe::Present(""))
            .with_element("button.send", Probe::Present(""))
            .with_click_failure("button.stale");

        let input = chain(&["textarea"]);
        let submit = chain(&["button.stale", "button.send"]);
        let plan = DispatchPlan {
            input_chain: &input,
            input_settle: Duration::ZERO,
            submit_chain: &submit,
        };

        let dispatch = send(&page, "hi", plan).await.expect("dispatch");

        assert_eq!(dispatch.submit_index, Some(1));
        assert_eq!(page.clicked(), vec!["button.send"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fill_failure_is_dispatch_error() {
        let page = FakePage::new()
            .with_element("textarea", Probe::Present(""))
            .with_fill_failure();

        let input = chain(&["textarea"]);
        let submit = chain(&["button"]);
        let plan = DispatchPlan {
            input_chain: &input,
            input_settle: Duration::ZERO,
            submit_chain: &submit,
        };

        let err = send(&page, "hi", plan).await.unwrap_err();
        assert!(matches!(err, FlowError::Dispatch(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_message_rejected_before_lookup() {
        let page = FakePage::new().with_element("textarea", Probe::Present(""));
        let input = chain(&["textarea"]);
        let plan = DispatchPlan {
            input_chain: &input,
            input_settle: Duration::ZERO,
            submit_chain: &[],
        };

        let err = send(&page, "", plan).await.unwrap_err();

        assert!(matches!(err, FlowError::EmptyMessage));
        assert!(page.lookups().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_sends_submit_twice() {
        let page = FakePage::new()
            .with_element("textarea", Probe::Present(""))
            .with_element("button", Probe::Present(""));
        let input = chain(&["textarea"]);
        let submit = chain(&["button"]);
        let plan = DispatchPlan {
            input_chain: &input,
            input_settle: Duration::ZERO,
            submit_chain: &submit,
        };

        send(&page, "one", plan).await.expect("first");
        send(&page, "one", plan).await.expect("second");

        assert_eq!(page.clicked().len(), 2);
    }
}
