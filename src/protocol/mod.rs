//! DevTools protocol message types.
//!
//! This module defines the message format exchanged with the browser over
//! its DevTools WebSocket.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Request` | Driver → Browser | Command request |
//! | `Response` | Browser → Driver | Command response (same `id`) |
//! | `Event` | Browser → Driver | Notification (no `id`) |
//!
//! # Command Naming
//!
//! Commands follow `Domain.methodName` format:
//!
//! - `Target.createBrowserContext`
//! - `Page.navigate`
//! - `Runtime.callFunctionOn`
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Command definitions by domain |
//! | `event` | Event types |
//! | `request` | Request and Response types |

// ============================================================================
// Submodules
// ============================================================================

/// Command definitions organized by domain.
pub mod command;

/// Event message types.
pub mod event;

/// Request and Response message types.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{BrowserCommand, Command, PageCommand, RuntimeCommand, TargetCommand};
pub use event::{Event, ParsedEvent};
pub use request::{Request, Response, ResponseError};
