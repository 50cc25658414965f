//! Request and Response message types.
//!
//! Defines the wire format for DevTools commands and their replies.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::{RequestId, SessionId};

use super::Command;

// ============================================================================
// Request
// ============================================================================

/// A command request from the driver to the browser.
///
/// # Format
///
/// ```json
/// {
///   "id": 12,
///   "method": "Domain.methodName",
///   "params": { ... },
///   "sessionId": "..."
/// }
/// ```
///
/// `sessionId` is omitted for browser-level commands.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Unique identifier for request/response correlation.
    pub id: RequestId,

    /// Target session (flattened mode), `None` for browser-level commands.
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,

    /// Command with method and params.
    #[serde(flatten)]
    pub command: Command,
}

impl Request {
    /// Creates a browser-level request with an auto-generated ID.
    #[inline]
    #[must_use]
    pub fn browser(command: Command) -> Self {
        Self {
            id: RequestId::next(),
            session_id: None,
            command,
        }
    }

    /// Creates a request routed to an attached session.
    #[inline]
    #[must_use]
    pub fn session(session_id: SessionId, command: Command) -> Self {
        Self {
            id: RequestId::next(),
            session_id: Some(session_id),
            command,
        }
    }

    /// Returns the `Domain.method` name of the command.
    #[inline]
    #[must_use]
    pub fn method(&self) -> &'static str {
        self.command.method()
    }
}

// ============================================================================
// Response
// ============================================================================

/// A response from the browser.
///
/// # Format
///
/// Success:
/// ```json
/// { "id": 12, "result": { ... } }
/// ```
///
/// Error:
/// ```json
/// { "id": 12, "error": { "code": -32000, "message": "..." } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Matches the request `id`.
    pub id: RequestId,

    /// Session the response belongs to, if any.
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<SessionId>,

    /// Result data (if success).
    #[serde(default)]
    pub result: Option<Value>,

    /// Error object (if error).
    #[serde(default)]
    pub error: Option<ResponseError>,
}

/// Error object carried by a failed response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseError {
    /// Numeric error code.
    pub code: i64,
    /// Error message.
    pub message: String,
    /// Optional additional detail.
    #[serde(default)]
    pub data: Option<String>,
}

impl Response {
    /// Returns `true` if this is a success response.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Extracts the result value, returning an error if the response was an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cdp`] if the browser rejected the command.
    pub fn into_result(self, method: &str) -> Result<Value> {
        match self.error {
            None => Ok(self.result.unwrap_or(Value::Null)),
            Some(err) => {
                let message = match err.data {
                    Some(data) => format!("{} ({data})", err.message),
                    None => err.message,
                };
                Err(Error::cdp(method, err.code, message))
            }
        }
    }

    /// Gets a string value from the result.
    ///
    /// Returns empty string if key not found or not a string.
    #[inline]
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        self.result
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{PageCommand, TargetCommand};
    use crate::identifiers::TargetId;

    #[test]
    fn test_browser_request_serialization() {
        let request = Request::browser(Command::Target(TargetCommand::CloseTarget {
            target_id: TargetId::new("T1"),
        }));
        let json = serde_json::to_value(&request).expect("serialize");

        assert_eq!(json["method"], "Target.closeTarget");
        assert!(json["id"].is_u64());
        assert!(json.get("sessionId").is_none());
    }

    #[test]
    fn test_session_request_serialization() {
        let request = Request::session(
            SessionId::new("S1"),
            Command::Page(PageCommand::Navigate {
                url: "https://example.com".to_string(),
            }),
        );
        let json = serde_json::to_value(&request).expect("serialize");

        assert_eq!(json["sessionId"], "S1");
        assert_eq!(json["params"]["url"], "https://example.com");
        assert_eq!(request.method(), "Page.navigate");
    }

    #[test]
    fn test_success_response() {
        let json_str = r#"{"id": 3, "result": {"frameId": "F1", "loaderId": "L1"}}"#;
        let response: Response = serde_json::from_str(json_str).expect("parse");

        assert!(response.is_success());
        assert_eq!(response.get_string("loaderId"), "L1");
        assert_eq!(response.get_string("missing"), "");
    }

    #[test]
    fn test_error_response() {
        let json_str = r#"{
            "id": 4,
            "error": {"code": -32000, "message": "No target with given id found"}
        }"#;
        let response: Response = serde_json::from_str(json_str).expect("parse");

        assert!(!response.is_success());
        let err = response.into_result("Target.attachToTarget").unwrap_err();
        assert!(matches!(err, Error::Cdp { code: -32000, .. }));
    }

    #[test]
    fn test_into_result_includes_data() {
        let json_str = r#"{
            "id": 5,
            "error": {"code": -32602, "message": "Invalid parameters", "data": "url: string value expected"}
        }"#;
        let response: Response = serde_json::from_str(json_str).expect("parse");
        let err = response.into_result("Page.navigate").unwrap_err();

        assert!(err.to_string().contains("string value expected"));
    }

    #[test]
    fn test_event_does_not_parse_as_response() {
        let json_str = r#"{"method": "Page.loadEventFired", "params": {"timestamp": 1.0}}"#;
        assert!(serde_json::from_str::<Response>(json_str).is_err());
    }
}
