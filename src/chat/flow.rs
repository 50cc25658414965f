//! Round-trip orchestration.
//!
//! [`ChatRelay::run`] drives one message through the stages
//!
//! ```text
//! START → SESSION_ACQUIRED → INPUT_RESOLVED → MESSAGE_SENT → SETTLING
//!       → RESPONSE_EXTRACTED → CLASSIFIED → EMITTED
//! ```
//!
//! and always produces exactly one [`ResultPayload`]. Any failure jumps
//! straight to an error payload; the session is torn down before `run`
//! returns either way.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tracing::{Instrument, debug, info, info_span, warn};

use super::FlowError;
use super::classifier::{ConversationState, KeywordClassifier, StateClassifier};
use super::config::ChatConfig;
use super::dispatcher::{self, DispatchPlan};
use super::extractor::{self, ExtractionPlan};
use super::lookup::ChatPage;
use super::payload::ResultPayload;
use super::session::{SessionProvider, with_session};

// ============================================================================
// FlowStage
// ============================================================================

/// Stages of one round trip, used for structured logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    /// Nothing acquired yet.
    Start,
    /// Browser running and chat page loaded.
    SessionAcquired,
    /// Message input found.
    InputResolved,
    /// Message entered and (maybe) submitted.
    MessageSent,
    /// Waiting for the reply to render.
    Settling,
    /// Reply text read.
    ResponseExtracted,
    /// Reply classified.
    Classified,
    /// Payload produced.
    Emitted,
}

impl FlowStage {
    /// Returns the stage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::SessionAcquired => "SESSION_ACQUIRED",
            Self::InputResolved => "INPUT_RESOLVED",
            Self::MessageSent => "MESSAGE_SENT",
            Self::Settling => "SETTLING",
            Self::ResponseExtracted => "RESPONSE_EXTRACTED",
            Self::Classified => "CLASSIFIED",
            Self::Emitted => "EMITTED",
        }
    }
}

impl fmt::Display for FlowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Reply
// ============================================================================

/// A successful round trip before it is turned into a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Reply text.
    pub response: String,
    /// Classified state.
    pub state: ConversationState,
    /// Whether a submit control was clicked.
    pub submitted: bool,
    /// Where the text came from (`structured`, `fallback`, `empty`).
    pub source: &'static str,
}

// ============================================================================
// ChatRelay
// ============================================================================

/// Sends one message to a chat page and reports the reply.
///
/// # Example
///
/// ```no_run
/// use webchat_relay::{ChatConfig, ChatRelay, Driver};
///
/// # async fn example() -> webchat_relay::Result<()> {
/// let driver = Driver::builder().build()?;
/// let relay = ChatRelay::new(driver, ChatConfig::default());
///
/// let payload = relay.run("안녕하세요", None).await;
/// println!("{}", payload.to_json());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ChatRelay<P, C = KeywordClassifier> {
    provider: P,
    config: ChatConfig,
    classifier: C,
}

impl<P> ChatRelay<P, KeywordClassifier>
where
    P: SessionProvider,
{
    /// Creates a relay classifying by the configured keyword.
    #[must_use]
    pub fn new(provider: P, config: ChatConfig) -> Self {
        let classifier = KeywordClassifier::new(config.recommendation_keyword.clone());
        Self {
            provider,
            config,
            classifier,
        }
    }
}

impl<P, C> ChatRelay<P, C>
where
    P: SessionProvider,
    C: StateClassifier,
{
    /// Replaces the state classifier.
    #[must_use]
    pub fn with_classifier<C2: StateClassifier>(self, classifier: C2) -> ChatRelay<P, C2> {
        ChatRelay {
            provider: self.provider,
            config: self.config,
            classifier,
        }
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Returns the session provider.
    #[inline]
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Runs one round trip and returns its payload. Never fails.
    ///
    /// `session_id` is accepted for interface compatibility and currently
    /// ignored; every run starts from a fresh browsing context.
    pub async fn run(&self, message: &str, session_id: Option<&str>) -> ResultPayload {
        let span = info_span!("chat", session_id = session_id.unwrap_or("-"));

        async {
            if session_id.is_some() {
                debug!("Session id supplied; session restoration is not supported, ignoring");
            }

            match self.exchange(message).await {
                Ok(reply) => {
                    info!(
                        stage = %FlowStage::Emitted,
                        state = %reply.state,
                        source = reply.source,
                        submitted = reply.submitted,
                        "Round trip complete"
                    );
                    ResultPayload::success(reply.response, reply.state, reply.submitted)
                }
                Err(e) => {
                    warn!(stage = %FlowStage::Emitted, error = %e, "Round trip failed");
                    ResultPayload::failure(&e, |error| self.config.apology(error))
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Runs the stages and returns the reply or the first fatal error.
    ///
    /// # Errors
    ///
    /// Returns a [`FlowError`] for empty messages, acquisition failures,
    /// a missing input, or a failed fill.
    pub async fn exchange(&self, message: &str) -> Result<Reply, FlowError> {
        info!(stage = %FlowStage::Start, chars = message.chars().count(), "Starting round trip");

        if message.is_empty() {
            return Err(FlowError::EmptyMessage);
        }

        with_session(
            &self.provider,
            &self.config.url,
            self.config.navigation_timeout,
            async |page| self.converse(page, message).await,
        )
        .await
    }

    /// The in-session part of the round trip.
    async fn converse<Pg>(&self, page: &Pg, message: &str) -> Result<Reply, FlowError>
    where
        Pg: ChatPage + ?Sized,
    {
        let config = &self.config;
        info!(stage = %FlowStage::SessionAcquired, "Session ready");

        tokio::time::sleep(config.post_navigation_pause).await;

        let dispatch = dispatcher::send(
            page,
            message,
            DispatchPlan {
                input_chain: &config.input_chain,
                input_settle: config.input_settle,
                submit_chain: &config.submit_chain,
            },
        )
        .await?;
        info!(stage = %FlowStage::InputResolved, candidate = dispatch.input_index, "Input resolved");
        info!(stage = %FlowStage::MessageSent, submitted = dispatch.submitted, "Message dispatched");

        info!(stage = %FlowStage::Settling, "Waiting for reply");
        let extraction = extractor::extract(
            page,
            ExtractionPlan {
                settle: config.reply_settle,
                response_chain: &config.response_chain,
                fallback_lines: config.fallback_lines,
            },
        )
        .await;
        let source = extraction.kind();
        info!(stage = %FlowStage::ResponseExtracted, source, "Reply read");

        let response = extraction.into_text();
        let state = self.classifier.classify(&response);
        info!(stage = %FlowStage::Classified, %state, "Reply classified");

        Ok(Reply {
            response,
            state,
            submitted: dispatch.submitted,
            source,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
