//! JavaScript execution methods.

use std::time::Duration;

use serde_json::{Value, json};
use tracing::trace;

use crate::error::{Error, Result};
use crate::identifiers::ObjectId;
use crate::protocol::RuntimeCommand;
use crate::transport::connection::DEFAULT_COMMAND_TIMEOUT;

use super::Page;

// ============================================================================
// Page - Script Execution
// ============================================================================

impl Page {
    /// Evaluates an expression in the page and returns its JSON value.
    ///
    /// Promises are awaited.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let title = page.evaluate("document.title").await?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScriptError`] if the expression throws.
    pub async fn evaluate(&self, expression: &str) -> Result<Value> {
        trace!(session_id = %self.inner.session_id, script_len = expression.len(), "Evaluating script");

        let command = RuntimeCommand::Evaluate {
            expression: expression.to_string(),
            await_promise: true,
            return_by_value: true,
        };

        let result = self.send(command.into()).await?;
        Ok(remote_value(check_exception(result)?))
    }

    /// Evaluates an expression and returns a handle to the resulting object.
    ///
    /// Returns `None` when the expression produces `null` or `undefined`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScriptError`] if the expression throws.
    pub(crate) async fn evaluate_handle(
        &self,
        expression: String,
        timeout: Duration,
    ) -> Result<Option<ObjectId>> {
        let command = RuntimeCommand::Evaluate {
            expression,
            await_promise: true,
            return_by_value: false,
        };

        let result = self.send_with_timeout(command.into(), timeout).await?;
        let remote = check_exception(result)?;

        Ok(remote
            .get("objectId")
            .and_then(Value::as_str)
            .map(ObjectId::new))
    }

    /// Calls a function declaration with `this` bound to a remote object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScriptError`] if the function throws.
    pub(crate) async fn call_function(
        &self,
        object_id: &ObjectId,
        function_declaration: &str,
        arguments: &[Value],
    ) -> Result<Value> {
        let command = RuntimeCommand::CallFunctionOn {
            function_declaration: function_declaration.to_string(),
            object_id: object_id.clone(),
            arguments: arguments.iter().map(|v| json!({ "value": v })).collect(),
            await_promise: true,
            return_by_value: true,
        };

        let result = self
            .send_with_timeout(command.into(), DEFAULT_COMMAND_TIMEOUT)
            .await?;
        Ok(remote_value(check_exception(result)?))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Converts `exceptionDetails` into an error, otherwise returns the remote object.
fn check_exception(mut result: Value) -> Result<Value> {
    if let Some(details) = result.get("exceptionDetails") {
        let message = details
            .pointer("/exception/description")
            .and_then(Value::as_str)
            .or_else(|| details.get("text").and_then(Value::as_str))
            .unwrap_or("Uncaught exception");
        return Err(Error::script_error(message));
    }

    Ok(result.get_mut("result").map(Value::take).unwrap_or(Value::Null))
}

/// Extracts the by-value payload of a remote object.
fn remote_value(mut remote: Value) -> Value {
    remote.get_mut("value").map(Value::take).unwrap_or(Value::Null)
}

// ============================================================================
// Tests
// ============================================================================
