//! Webchat Relay - one message in, one reply out, through a real browser.
//!
//! This library drives a Chromium-family browser over the DevTools protocol
//! to send a single message to a browser-rendered chat interface and report
//! the rendered reply as one JSON line.
//!
//! # Architecture
//!
//! Two layers:
//!
//! - **Browser layer** ([`driver`], [`transport`], [`protocol`], [`browser`]):
//!   launches the browser with a throwaway profile, speaks the DevTools
//!   protocol over a WebSocket, and exposes [`Page`] and [`Element`] handles.
//! - **Chat layer** ([`chat`]): resolves controls through ordered selector
//!   fallbacks, sends the message, extracts and classifies the reply, and
//!   builds the [`ResultPayload`].
//!
//! Key design principles:
//!
//! - Each [`Browser`] owns: browser process + profile directory + connection
//! - Each [`Page`] lives in its own browsing context; nothing persists between runs
//! - The chat layer only sees the [`chat::ChatPage`] capability trait
//! - Every run ends in exactly one payload
//!
//! # Quick Start
//!
//! ```no_run
//! use webchat_relay::{ChatConfig, ChatRelay, Driver, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let driver = Driver::builder().headless().build()?;
//!     let relay = ChatRelay::new(driver, ChatConfig::default());
//!
//!     let payload = relay.run("안녕하세요", None).await;
//!     println!("{}", payload.to_json());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`browser`] | Browser entities: [`Browser`], [`Page`], [`Element`] |
//! | [`chat`] | Chat round trip: [`ChatRelay`], [`ChatConfig`], [`ResultPayload`] |
//! | [`driver`] | Driver factory and launch options |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | DevTools message types (internal) |
//! | [`transport`] | WebSocket transport layer (internal) |

// ============================================================================
// Modules
// ============================================================================

/// Browser entities: Browser, Page, Element.
///
/// - [`Browser`] - Running browser (owns the process and profile)
/// - [`Page`] - One page in an isolated browsing context
/// - [`Element`] - Remote DOM element handle
pub mod browser;

/// Chat round-trip layer.
pub mod chat;

/// Driver factory and configuration.
///
/// Use [`Driver::builder()`] to create a configured driver instance.
pub mod driver;

/// Error types and result aliases.
///
/// All fallible browser operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for protocol entities.
pub mod identifiers;

/// DevTools protocol message types.
pub mod protocol;

/// WebSocket transport layer.
///
/// Endpoint discovery and the multiplexed DevTools connection.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Browser types
pub use browser::{Browser, By, Element, Page, WaitState};

// Chat types
pub use chat::{
    ChatConfig, ChatRelay, ConversationState, FlowError, ResultPayload, SelectorCandidate,
};

// Driver types
pub use driver::{BrowserOptions, Driver, DriverBuilder, Profile};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{BrowserContextId, ObjectId, RequestId, SessionId, SubscriptionId, TargetId};
