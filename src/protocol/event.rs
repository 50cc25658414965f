//! Event message types.
//!
//! Events are notifications the browser pushes without a request id.
//!
//! # Event Types
//!
//! | Domain | Events |
//! |--------|--------|
//! | `Page` | `lifecycleEvent` |
//! | `Target` | `detachedFromTarget`, `targetCrashed` |
//! | `Inspector` | `detached` |

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;

use crate::identifiers::SessionId;

// ============================================================================
// Event
// ============================================================================

/// An event notification from the browser.
///
/// # Format
///
/// ```json
/// {
///   "method": "Domain.eventName",
///   "params": { ... },
///   "sessionId": "..."
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Event name in `Domain.eventName` format.
    pub method: String,

    /// Event-specific data.
    #[serde(default)]
    pub params: Value,

    /// Session that emitted the event (`None` for browser-level events).
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<SessionId>,
}

impl Event {
    /// Returns the domain name from the method.
    #[inline]
    #[must_use]
    pub fn domain(&self) -> &str {
        self.method.split('.').next().unwrap_or_default()
    }

    /// Returns the event name from the method.
    #[inline]
    #[must_use]
    pub fn event_name(&self) -> &str {
        self.method.split('.').nth(1).unwrap_or_default()
    }

    /// Returns `true` if the event was emitted by the given session.
    #[inline]
    #[must_use]
    pub fn is_from(&self, session_id: &SessionId) -> bool {
        self.session_id.as_ref() == Some(session_id)
    }

    /// Parses the event into a typed variant.
    #[must_use]
    pub fn parse(&self) -> ParsedEvent {
        let str_param = |key: &str| {
            self.params
                .get(key)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        match self.method.as_str() {
            "Page.lifecycleEvent" => ParsedEvent::Lifecycle {
                frame_id: str_param("frameId"),
                loader_id: str_param("loaderId"),
                name: str_param("name"),
            },
            "Target.detachedFromTarget" => ParsedEvent::Detached {
                session_id: SessionId::new(str_param("sessionId")),
            },
            "Target.targetCrashed" | "Inspector.targetCrashed" => ParsedEvent::Crashed,
            _ => ParsedEvent::Other,
        }
    }
}

// ============================================================================
// ParsedEvent
// ============================================================================

/// Parsed event types for type-safe handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedEvent {
    /// Page lifecycle milestone (`init`, `load`, `networkIdle`, ...).
    Lifecycle {
        /// Frame the milestone belongs to.
        frame_id: String,
        /// Loader (navigation) the milestone belongs to.
        loader_id: String,
        /// Milestone name.
        name: String,
    },

    /// A session was detached from its target.
    Detached {
        /// Detached session.
        session_id: SessionId,
    },

    /// The renderer crashed.
    Crashed,

    /// Any event this crate does not interpret.
    Other,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_event_parse() {
        let json_str = r#"{
            "method": "Page.lifecycleEvent",
            "params": {"frameId": "F1", "loaderId": "L1", "name": "networkIdle", "timestamp": 1.0},
            "sessionId": "S1"
        }"#;
        let event: Event = serde_json::from_str(json_str).expect("parse");

        assert_eq!(event.domain(), "Page");
        assert_eq!(event.event_name(), "lifecycleEvent");
        assert!(event.is_from(&SessionId::new("S1")));
        assert_eq!(
            event.parse(),
            ParsedEvent::Lifecycle {
                frame_id: "F1".into(),
                loader_id: "L1".into(),
                name: "networkIdle".into(),
            }
        );
    }

    #[test]
    fn test_browser_level_event_has_no_session() {
        let json_str = r#"{"method": "Target.targetCrashed", "params": {}}"#;
        let event: Event = serde_json::from_str(json_str).expect("parse");

        assert!(event.session_id.is_none());
        assert_eq!(event.parse(), ParsedEvent::Crashed);
    }

    #[test]
    fn test_unknown_event() {
        let json_str = r#"{"method": "Network.dataReceived", "params": {"requestId": "1"}}"#;
        let event: Event = serde_json::from_str(json_str).expect("parse");
        assert_eq!(event.parse(), ParsedEvent::Other);
    }
}
