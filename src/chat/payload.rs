//! Result payload emission.
//!
//! Exactly one payload leaves the process per invocation, on stdout, as a
//! single JSON line:
//!
//! ```text
//! {"response":"...","state":"GATHERING","recommendations":null,"submitted":true}
//! {"error":"...","response":"죄송합니다. ..."}
//! ```
//!
//! Non-ASCII text is written as-is, not `\u` escaped.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::classifier::ConversationState;

// ============================================================================
// ResultPayload
// ============================================================================

/// The single externally visible result of a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultPayload {
    /// A reply was obtained (possibly empty).
    Success {
        /// Reply text.
        response: String,
        /// Classified conversation state.
        state: ConversationState,
        /// Reserved; always `null`.
        recommendations: Option<Vec<Value>>,
        /// `false` when no submit control was found and the message never left.
        submitted: bool,
    },

    /// The round trip failed.
    Failure {
        /// Error description.
        error: String,
        /// User-facing apology embedding the error description.
        response: String,
    },
}

impl ResultPayload {
    /// Builds the success shape.
    #[must_use]
    pub fn success(response: impl Into<String>, state: ConversationState, submitted: bool) -> Self {
        Self::Success {
            response: response.into(),
            state,
            recommendations: None,
            submitted,
        }
    }

    /// Builds the failure shape, rendering `apology` with the error text.
    #[must_use]
    pub fn failure(error: &dyn fmt::Display, apology: impl FnOnce(&str) -> String) -> Self {
        let error = error.to_string();
        let response = apology(&error);
        Self::Failure { error, response }
    }

    /// Returns `true` for the success shape.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the `response` field of either shape.
    #[inline]
    #[must_use]
    pub fn response(&self) -> &str {
        match self {
            Self::Success { response, .. } | Self::Failure { response, .. } => response,
        }
    }

    /// Serializes to one JSON line (no trailing newline).
    #[must_use]
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            // Unreachable for these field types.
            Err(e) => format!(
                "{{\"error\":{0},\"response\":{0}}}",
                Value::from(e.to_string())
            ),
        }
    }

    /// Writes the payload as a single line and flushes.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from `out`.
    pub fn emit<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "{}", self.to_json())?;
        out.flush()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use serde_json::json;

    fn apology(error: &str) -> String {
        format!("죄송합니다: {error}")
    }

    #[test]
    fn test_success_shape() {
        let payload = ResultPayload::success("추천드려요", ConversationState::Recommending, true);

        assert_eq!(
            payload.to_json(),
            r#"{"response":"추천드려요","state":"RECOMMENDING","recommendations":null,"submitted":true}"#
        );
        assert!(payload.is_success());
    }

    #[test]
    fn test_failure_shape() {
        let payload = ResultPayload::failure(&"Timeout after 30000ms: navigation", apology);

        let value: Value = serde_json::from_str(&payload.to_json()).expect("valid json");
        assert_eq!(
            value,
            json!({
                "error": "Timeout after 30000ms: navigation",
                "response": "죄송합니다: Timeout after 30000ms: navigation"
            })
        );
        assert!(!payload.is_success());
    }

    #[test]
    fn test_emit_writes_one_line() {
        let mut out = Vec::new();
        ResultPayload::success("hi", ConversationState::Gathering, false)
            .emit(&mut out)
            .expect("write");

        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.matches('\n').count(), 1);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_parse_back_distinguishes_shapes() {
        let failure: ResultPayload =
            serde_json::from_str(r#"{"error":"x","response":"y"}"#).expect("parse");
        assert!(matches!(failure, ResultPayload::Failure { .. }));

        let success: ResultPayload = serde_json::from_str(
            r#"{"response":"y","state":"GATHERING","recommendations":null,"submitted":true}"#,
        )
        .expect("parse");
        assert!(success.is_success());
    }

    proptest! {
        #[test]
        fn prop_payload_is_single_line_json(response in "\\PC*", error in "\\PC*", ok in any::<bool>()) {
            let payload = if ok {
                ResultPayload::success(response, ConversationState::Gathering, true)
            } else {
                ResultPayload::failure(&error, apology)
            };

            let json = payload.to_json();
            prop_assert!(!json.contains('\n'));

            let value: Value = serde_json::from_str(&json).expect("valid json");
            let object = value.as_object().expect("object");
            if ok {
                prop_assert_eq!(object.len(), 4);
                prop_assert!(object["recommendations"].is_null());
            } else {
                prop_assert_eq!(object.len(), 2);
                prop_assert!(!object["response"].as_str().unwrap_or_default().is_empty());
            }
        }
    }
}
