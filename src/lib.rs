//! GPFS Provisioner
//!
//! Provisions GPFS-backed Kubernetes PersistentVolumes for the members of a
//! GitHub organization, so each member's JupyterHub claim has a volume
//! waiting for it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       gpfs-provisioner                       │
//! │                                                              │
//! │  startup                     runtime                         │
//! │  ┌────────────────┐          ┌────────────────┐              │
//! │  │   Membership   │          │    Webhook     │◀── GitHub    │
//! │  │   Reconciler   │          │    Receiver    │    deliveries│
//! │  └───────┬────────┘          └───────┬────────┘              │
//! │          │        enqueue logins     │                       │
//! │          └──────────┬────────────────┘                       │
//! │                     ▼                                        │
//! │            ┌────────────────┐     ┌──────────────────┐       │
//! │            │   Work Queue   │────▶│   Provisioning   │       │
//! │            │  (FIFO, mpsc)  │     │   Worker (x1)    │       │
//! │            └────────────────┘     └────────┬─────────┘       │
//! │                                            ▼                 │
//! │                                 PersistentVolume create      │
//! │                                 (+ backing directory)        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`naming`]: login escaping for resource names
//! - [`volume`]: PersistentVolume descriptor builder and directory setup
//! - [`queue`]: the provisioning work queue
//! - [`provision`]: the single-consumer worker loop
//! - [`reconcile`]: startup membership reconciliation
//! - [`webhook`]: GitHub webhook receiver
//! - [`github`] / [`cluster`]: adapters for the two external systems
//! - [`domain`]: trait seams between core and adapters
//! - [`config`], [`error`], [`metrics`]: ambient concerns

pub mod cluster;
pub mod config;
pub mod domain;
pub mod error;
pub mod github;
pub mod metrics;
pub mod naming;
pub mod provision;
pub mod queue;
pub mod reconcile;
pub mod volume;
pub mod webhook;

// Re-export commonly used types
pub use cluster::KubeVolumes;
pub use config::{Args, Settings};
pub use domain::ports::{MembershipService, VolumeStore, WebhookRegistration};
pub use error::{Error, Result};
pub use github::{GithubClient, GithubConfig, GithubCredentials};
pub use metrics::Metrics;
pub use provision::Provisioner;
pub use queue::{work_queue, WorkQueue, WorkReceiver};
pub use reconcile::reconcile;
pub use volume::{build_volume, DirectorySettings, VolumeSettings};
pub use webhook::{webhook_router, WebhookState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
