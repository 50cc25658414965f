//! Command definitions organized by DevTools domain.
//!
//! Commands follow the `Domain.methodName` format. Each domain enum is
//! adjacently tagged so it serializes directly into the `method`/`params`
//! pair of a request.
//!
//! # Command Domains
//!
//! | Domain | Commands |
//! |--------|----------|
//! | `Browser` | Close |
//! | `Target` | Browser contexts, targets, attachment |
//! | `Page` | Lifecycle events, navigation |
//! | `Runtime` | Expression evaluation, function calls on DOM nodes |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifiers::{BrowserContextId, ObjectId, TargetId};

// ============================================================================
// Command Wrapper
// ============================================================================

/// All protocol commands organized by domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    /// Browser domain commands.
    Browser(BrowserCommand),
    /// Target domain commands.
    Target(TargetCommand),
    /// Page domain commands.
    Page(PageCommand),
    /// Runtime domain commands.
    Runtime(RuntimeCommand),
}

impl Command {
    /// Returns the `Domain.method` name of this command.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::Browser(cmd) => cmd.method(),
            Self::Target(cmd) => cmd.method(),
            Self::Page(cmd) => cmd.method(),
            Self::Runtime(cmd) => cmd.method(),
        }
    }
}

impl From<BrowserCommand> for Command {
    fn from(cmd: BrowserCommand) -> Self {
        Self::Browser(cmd)
    }
}

impl From<TargetCommand> for Command {
    fn from(cmd: TargetCommand) -> Self {
        Self::Target(cmd)
    }
}

impl From<PageCommand> for Command {
    fn from(cmd: PageCommand) -> Self {
        Self::Page(cmd)
    }
}

impl From<RuntimeCommand> for Command {
    fn from(cmd: RuntimeCommand) -> Self {
        Self::Runtime(cmd)
    }
}

// ============================================================================
// Browser Commands
// ============================================================================

/// Browser domain commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum BrowserCommand {
    /// Close the browser gracefully.
    #[serde(rename = "Browser.close")]
    Close,
}

impl BrowserCommand {
    fn method(&self) -> &'static str {
        match self {
            Self::Close => "Browser.close",
        }
    }
}

// ============================================================================
// Target Commands
// ============================================================================

/// Target domain commands for isolated contexts and page targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum TargetCommand {
    /// Create an isolated browser context (like an incognito profile).
    #[serde(rename = "Target.createBrowserContext")]
    CreateBrowserContext {
        /// Dispose the context when the creating session detaches.
        #[serde(rename = "disposeOnDetach")]
        dispose_on_detach: bool,
    },

    /// Dispose a browser context and close all its pages.
    #[serde(rename = "Target.disposeBrowserContext")]
    DisposeBrowserContext {
        /// Context to dispose.
        #[serde(rename = "browserContextId")]
        browser_context_id: BrowserContextId,
    },

    /// Create a page target.
    #[serde(rename = "Target.createTarget")]
    CreateTarget {
        /// Initial URL.
        url: String,
        /// Context the page belongs to.
        #[serde(rename = "browserContextId", skip_serializing_if = "Option::is_none")]
        browser_context_id: Option<BrowserContextId>,
    },

    /// Attach to a target and obtain a session.
    #[serde(rename = "Target.attachToTarget")]
    AttachToTarget {
        /// Target to attach to.
        #[serde(rename = "targetId")]
        target_id: TargetId,
        /// Multiplex the session over the browser connection.
        flatten: bool,
    },

    /// Close a page target.
    #[serde(rename = "Target.closeTarget")]
    CloseTarget {
        /// Target to close.
        #[serde(rename = "targetId")]
        target_id: TargetId,
    },
}

impl TargetCommand {
    fn method(&self) -> &'static str {
        match self {
            Self::CreateBrowserContext { .. } => "Target.createBrowserContext",
            Self::DisposeBrowserContext { .. } => "Target.disposeBrowserContext",
            Self::CreateTarget { .. } => "Target.createTarget",
            Self::AttachToTarget { .. } => "Target.attachToTarget",
            Self::CloseTarget { .. } => "Target.closeTarget",
        }
    }
}

// ============================================================================
// Page Commands
// ============================================================================

/// Page domain commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum PageCommand {
    /// Enable page events.
    #[serde(rename = "Page.enable")]
    Enable,

    /// Toggle `Page.lifecycleEvent` notifications.
    #[serde(rename = "Page.setLifecycleEventsEnabled")]
    SetLifecycleEventsEnabled {
        /// Whether lifecycle events are emitted.
        enabled: bool,
    },

    /// Navigate the main frame.
    #[serde(rename = "Page.navigate")]
    Navigate {
        /// URL to navigate to.
        url: String,
    },
}

impl PageCommand {
    fn method(&self) -> &'static str {
        match self {
            Self::Enable => "Page.enable",
            Self::SetLifecycleEventsEnabled { .. } => "Page.setLifecycleEventsEnabled",
            Self::Navigate { .. } => "Page.navigate",
        }
    }
}

// ============================================================================
// Runtime Commands
// ============================================================================

/// Runtime domain commands for script execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum RuntimeCommand {
    /// Enable runtime events.
    #[serde(rename = "Runtime.enable")]
    Enable,

    /// Evaluate an expression in the page's main world.
    #[serde(rename = "Runtime.evaluate")]
    Evaluate {
        /// JavaScript expression.
        expression: String,
        /// Await the resulting promise.
        #[serde(rename = "awaitPromise")]
        await_promise: bool,
        /// Return the value as JSON instead of a remote object.
        #[serde(rename = "returnByValue")]
        return_by_value: bool,
    },

    /// Call a function with `this` bound to a remote object.
    #[serde(rename = "Runtime.callFunctionOn")]
    CallFunctionOn {
        /// Function source.
        #[serde(rename = "functionDeclaration")]
        function_declaration: String,
        /// Receiver object.
        #[serde(rename = "objectId")]
        object_id: ObjectId,
        /// Call arguments (`{"value": ...}` entries).
        arguments: Vec<Value>,
        /// Await the resulting promise.
        #[serde(rename = "awaitPromise")]
        await_promise: bool,
        /// Return the value as JSON instead of a remote object.
        #[serde(rename = "returnByValue")]
        return_by_value: bool,
    },
}

impl RuntimeCommand {
    fn method(&self) -> &'static str {
        match self {
            Self::Enable => "Runtime.enable",
            Self::Evaluate { .. } => "Runtime.evaluate",
            Self::CallFunctionOn { .. } => "Runtime.callFunctionOn",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
