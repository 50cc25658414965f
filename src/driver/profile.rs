//! Browser user data directory management.
//!
//! Every launched browser gets a fresh temporary user data directory so no
//! cookies, storage, or crash-recovery state leak between invocations. The
//! directory is deleted when the [`Profile`] is dropped.

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::{Error, Result};

// ============================================================================
// Profile
// ============================================================================

/// A temporary browser user data directory.
pub struct Profile {
    /// Temporary directory handle (keeps the directory alive).
    _temp_dir: TempDir,

    /// Path to the profile directory.
    path: PathBuf,
}

impl Profile {
    /// Creates a new temporary profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Profile`] if the temporary directory cannot be created.
    pub fn new_temp() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("webchat-relay-")
            .map_err(|e| Error::profile(format!("Failed to create temp profile: {e}")))?;

        let path = temp_dir.path().to_path_buf();
        debug!(path = %path.display(), "Created temporary profile");

        Ok(Self {
            _temp_dir: temp_dir,
            path,
        })
    }

    /// Returns the profile directory path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile").field("path", &self.path).finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
