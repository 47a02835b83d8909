//! Configuration surface
//!
//! Everything is a CLI flag with an environment fallback; the env names
//! match the original deployment manifests (`GIT_PASSWORD`, `NAMESPACE`,
//! ...). [`Args::into_settings`] validates once at startup and splits the
//! flat surface into per-component settings.

use crate::error::{Error, Result};
use crate::github::{GithubConfig, GithubCredentials};
use crate::volume::{DirectorySettings, VolumeSettings};
use clap::Parser;
use std::path::PathBuf;

/// GPFS Provisioner - PersistentVolumes for GitHub organization members
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// GitHub username; omit to authenticate with a token alone
    #[arg(long, env = "GIT_USERNAME")]
    pub git_username: Option<String>,

    /// GitHub password or personal access token
    #[arg(long, env = "GIT_PASSWORD")]
    pub git_password: String,

    /// GitHub organization to watch
    #[arg(long, env = "GIT_ORGANIZATION")]
    pub git_organization: String,

    /// Externally reachable base URL for webhook callbacks
    #[arg(long, env = "EXTERNAL_HOST")]
    pub external_host: String,

    /// Path component the webhook is served on
    #[arg(long, env = "CALLBACK_PATH")]
    pub callback_path: String,

    /// Namespace for volumes and their claim references
    #[arg(long, env = "NAMESPACE")]
    pub namespace: String,

    /// Directory on the GPFS mount holding per-user paths
    #[arg(long, env = "BASE_PATH")]
    pub base_path: PathBuf,

    /// Capacity of each provisioned volume, e.g. "10Gi"
    #[arg(long, env = "STORAGE_SIZE")]
    pub storage_size: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,

    /// Use the in-cluster service account instead of a kubeconfig
    #[arg(long, env = "INCLUSTER")]
    pub incluster: bool,

    /// Create each user's backing directory after provisioning
    #[arg(long, env = "MANAGE_DIRECTORIES")]
    pub manage_directories: bool,

    /// Octal mode for created directories
    #[arg(long, env = "PERMISSION", default_value = "755")]
    pub permission: String,

    /// Owner uid for created directories
    #[arg(long, env = "OWN_UID", default_value = "1000")]
    pub own_uid: u32,

    /// Owner gid for created directories
    #[arg(long, env = "OWN_GID", default_value = "1000")]
    pub own_gid: u32,

    /// Webhook server bind address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8000")]
    pub listen_addr: String,
}

/// Validated startup configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub github: GithubConfig,
    pub volume: VolumeSettings,
    pub directory: Option<DirectorySettings>,
    /// Callback path with any leading slash stripped
    pub callback_path: String,
    /// Full callback URL GitHub will be told to deliver to
    pub webhook_url: String,
    pub listen_addr: String,
    pub incluster: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl Args {
    pub fn into_settings(self) -> Result<Settings> {
        let callback_path = self.callback_path.trim_start_matches('/').to_string();
        if callback_path.is_empty() {
            return Err(Error::Configuration("callback path is empty".into()));
        }
        // These are capture syntax to the router and would panic at route
        // registration instead of failing startup cleanly.
        if callback_path.contains([':', '*', '{', '}']) {
            return Err(Error::Configuration(format!(
                "callback path contains router syntax characters: {}",
                callback_path
            )));
        }
        if self.storage_size.trim().is_empty() {
            return Err(Error::Configuration("storage size is empty".into()));
        }

        let mode = u32::from_str_radix(&self.permission, 8).map_err(|_| {
            Error::Configuration(format!("invalid octal permission: {}", self.permission))
        })?;

        let webhook_url = format!(
            "{}/{}",
            self.external_host.trim_end_matches('/'),
            callback_path
        );

        let directory = self.manage_directories.then_some(DirectorySettings {
            mode,
            uid: self.own_uid,
            gid: self.own_gid,
        });

        Ok(Settings {
            github: GithubConfig::new(
                GithubCredentials {
                    username: self.git_username,
                    password: self.git_password,
                },
                self.git_organization,
            ),
            volume: VolumeSettings {
                namespace: self.namespace,
                base_path: self.base_path,
                storage_size: self.storage_size,
            },
            directory,
            callback_path,
            webhook_url,
            listen_addr: self.listen_addr,
            incluster: self.incluster,
            log_level: self.log_level,
            log_json: self.log_json,
        })
    }
}
