//! Type-safe identifiers for browser entities.
//!
//! Newtype wrappers prevent mixing incompatible IDs at compile time.
//!
//! | Type | Source |
//! |------|--------|
//! | [`RequestId`] | Local counter, correlates command responses |
//! | [`SubscriptionId`] | Local counter, keys event subscribers |
//! | [`SessionId`] | `Target.attachToTarget` (flattened session) |
//! | [`TargetId`] | `Target.createTarget` |
//! | [`BrowserContextId`] | `Target.createBrowserContext` |
//! | [`ObjectId`] | `Runtime.RemoteObjectId` of a DOM node |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

// ============================================================================
// Counters
// ============================================================================

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

// ============================================================================
// RequestId
// ============================================================================

/// Numeric command identifier, unique per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// Wraps an existing ID (e.g. one read off the wire).
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocates the next unused ID.
    #[inline]
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// SubscriptionId
// ============================================================================

/// Handle for a registered event subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Allocates the next unused ID.
    #[inline]
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

// ============================================================================
// String Identifiers
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a browser-assigned identifier.
            #[inline]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Flattened DevTools session attached to one target.
    SessionId
);

string_id!(
    /// A page target.
    TargetId
);

string_id!(
    /// An isolated browser context (separate cookies and storage).
    BrowserContextId
);

string_id!(
    /// Remote object handle for a DOM node held by the page runtime.
    ObjectId
);

// ============================================================================
// Tests
// ============================================================================
