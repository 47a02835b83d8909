//! Backing directory setup
//!
//! Kubernetes creates a `DirectoryOrCreate` host path lazily, only once the
//! claim binds on some node. Creating the directory eagerly here means the
//! user's home exists with the right mode and ownership before their first
//! server starts.

use crate::error::Result;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::{info, warn};

/// Mode and ownership applied to each per-user directory
#[derive(Debug, Clone, Copy)]
pub struct DirectorySettings {
    /// Permission bits, e.g. 0o755
    pub mode: u32,
    /// Owner uid
    pub uid: u32,
    /// Owner gid
    pub gid: u32,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            mode: 0o755,
            uid: 1000,
            gid: 1000,
        }
    }
}

/// Create `path` and apply the configured mode and ownership.
///
/// A pre-existing directory is not an error; the mode is still enforced on
/// it. Ownership failure (running unprivileged, NFS squash) is logged and
/// tolerated. Only a failure to create or chmod the directory propagates.
pub fn prepare_directory(path: &Path, settings: &DirectorySettings) -> Result<()> {
    if let Err(err) = fs::create_dir_all(path) {
        if !path.is_dir() {
            return Err(err.into());
        }
        info!("Directory {} already exists", path.display());
    }

    // create_dir_all honors the process umask, so the mode is applied
    // explicitly, also re-asserting it on pre-existing directories.
    fs::set_permissions(path, fs::Permissions::from_mode(settings.mode))?;

    if let Err(err) = std::os::unix::fs::chown(path, Some(settings.uid), Some(settings.gid)) {
        warn!(
            "Failed to chown {} to {}:{}: {}",
            path.display(),
            settings.uid,
            settings.gid,
            err
        );
    }

    Ok(())
}
