//! WebSocket transport layer.
//!
//! This module handles communication between the driver (Rust) and the
//! browser's DevTools endpoint.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │ Browser (Rust)  │                              │  Chromium       │
//! │                 │         WebSocket            │                 │
//! │  Connection     │─────────────────────────────►│  DevTools       │
//! │  (event loop)   │◄─────────────────────────────│  endpoint       │
//! │                 │   ws://127.0.0.1:PORT/...    │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. Launch the browser with `--remote-debugging-port=0`
//! 2. `endpoint::discover` - Read the announced WebSocket URL from stderr
//! 3. `Connection::connect` - Handshake and spawn the event loop
//! 4. `Connection::send` - Commands, responses, event subscriptions
//! 5. `Connection::shutdown` - Close the socket
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | WebSocket connection and event loop |
//! | `endpoint` | DevTools endpoint discovery |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and event loop.
pub mod connection;

/// DevTools endpoint discovery from browser stderr.
pub mod endpoint;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, EventHandler};
