//! Volume descriptor builder
//!
//! Pure function from a GitHub login to a fully-specified `PersistentVolume`
//! plus the host path backing it. Nothing here talks to the cluster; the
//! worker submits the descriptor and discards it.

use crate::naming;
use k8s_openapi::api::core::v1::{
    HostPathVolumeSource, ObjectReference, PersistentVolume, PersistentVolumeSpec,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// =============================================================================
// Naming Constants
// =============================================================================

/// Prefix for generated PersistentVolume names
pub const VOLUME_PREFIX: &str = "gpfs-";

/// Prefix for the claim each volume is pre-bound to.
///
/// Matches the claim names JupyterHub generates per user; the claim itself is
/// created by JupyterHub, never by this service.
pub const CLAIM_PREFIX: &str = "claim-";

/// Storage class every generated volume carries
pub const STORAGE_CLASS: &str = "gpfs";

// =============================================================================
// Settings
// =============================================================================

/// Fixed parameters shared by every generated volume
#[derive(Debug, Clone)]
pub struct VolumeSettings {
    /// Namespace for the volume metadata and claim reference
    pub namespace: String,
    /// Directory on the GPFS mount under which per-user paths live
    pub base_path: PathBuf,
    /// Capacity quantity string, e.g. "10Gi"; opaque to this module
    pub storage_size: String,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            namespace: "jupyterhub".to_string(),
            base_path: PathBuf::from("/gpfs/home"),
            storage_size: "10Gi".to_string(),
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Build the PersistentVolume and backing host path for a login.
///
/// The login is escaped via [`naming::escape`] and the escaped form is used
/// for the volume name, the claim reference, and the host path component, so
/// all three always agree for a given user.
pub fn build_volume(login: &str, settings: &VolumeSettings) -> (PersistentVolume, PathBuf) {
    let escaped = naming::escape(login);

    let name = format!("{}{}", VOLUME_PREFIX, escaped);
    let claim_name = format!("{}{}", CLAIM_PREFIX, escaped);
    let path = settings.base_path.join(&escaped);

    let metadata = ObjectMeta {
        name: Some(name),
        namespace: Some(settings.namespace.clone()),
        ..Default::default()
    };

    let claim_ref = ObjectReference {
        name: Some(claim_name),
        namespace: Some(settings.namespace.clone()),
        ..Default::default()
    };

    let host_path = HostPathVolumeSource {
        path: path_to_string(&path),
        type_: Some("DirectoryOrCreate".to_string()),
    };

    let mut capacity = BTreeMap::new();
    capacity.insert(
        "storage".to_string(),
        Quantity(settings.storage_size.clone()),
    );

    let spec = PersistentVolumeSpec {
        access_modes: Some(vec!["ReadWriteOnce".to_string()]),
        capacity: Some(capacity),
        claim_ref: Some(claim_ref),
        host_path: Some(host_path),
        storage_class_name: Some(STORAGE_CLASS.to_string()),
        persistent_volume_reclaim_policy: Some("Retain".to_string()),
        volume_mode: Some("Filesystem".to_string()),
        ..Default::default()
    };

    let pv = PersistentVolume {
        metadata,
        spec: Some(spec),
        status: None,
    };

    (pv, path)
}

fn path_to_string(path: &Path) -> String {
    // Paths are built from UTF-8 settings plus escaped (ASCII) logins, so
    // this conversion never actually loses anything.
    path.to_string_lossy().into_owned()
}
