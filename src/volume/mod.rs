//! PersistentVolume descriptor construction
//!
//! - [`builder`]: pure construction of the `PersistentVolume` object and the
//!   backing host path for a given login
//! - [`directory`]: post-creation setup of the backing directory on the GPFS
//!   mount (mode + ownership)

pub mod builder;
pub mod directory;

pub use builder::{build_volume, VolumeSettings, CLAIM_PREFIX, STORAGE_CLASS, VOLUME_PREFIX};
pub use directory::{prepare_directory, DirectorySettings};
