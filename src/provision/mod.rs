//! Provisioning worker
//!
//! The single consumer of the work queue. Each dequeued login gets exactly
//! one PersistentVolume create attempt; failures are logged and dropped with
//! no retry, matching the reconcile-on-restart recovery model (a user missed
//! here is picked up again by the next startup pass).

use crate::domain::ports::VolumeStore;
use crate::metrics::Metrics;
use crate::queue::WorkReceiver;
use crate::volume::{build_volume, prepare_directory, DirectorySettings, VolumeSettings};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Long-lived provisioning loop
pub struct Provisioner {
    store: Arc<dyn VolumeStore>,
    volume_settings: VolumeSettings,
    /// When set, the backing directory is created after each successful
    /// volume creation.
    directory_settings: Option<DirectorySettings>,
    metrics: Arc<Metrics>,
}

impl Provisioner {
    pub fn new(
        store: Arc<dyn VolumeStore>,
        volume_settings: VolumeSettings,
        directory_settings: Option<DirectorySettings>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            store,
            volume_settings,
            directory_settings,
            metrics,
        }
    }

    /// Drain the queue forever, one login at a time.
    ///
    /// Returns only when every producer handle has been dropped, which in
    /// the running process never happens.
    pub async fn run(self, mut receiver: WorkReceiver) {
        info!("Handling provision requests");

        while let Some(login) = receiver.recv().await {
            self.provision(&login).await;
        }

        info!("Work queue closed; provisioning worker exiting");
    }

    /// One provisioning attempt. Never fails; every error ends at a log line.
    async fn provision(&self, login: &str) {
        info!("Processing request for user {:?}", login);

        let (pv, path) = build_volume(login, &self.volume_settings);

        match self.store.create_persistent_volume(&pv).await {
            Err(err) if err.is_conflict() => {
                // Expected on every restart for already-provisioned users;
                // the reconciliation pass enqueues all of them again.
                info!("PersistentVolume for {} already exists", login);
                self.metrics.provisions_failed.inc();
            }
            Err(err) => {
                debug!("Failed to create with error {}", err);
                info!("Failed to create a PersistentVolume for {}", login);
                self.metrics.provisions_failed.inc();
            }
            Ok(()) => {
                info!("Successfully created PersistentVolume for {}", login);
                self.metrics.provisions_succeeded.inc();

                // Kubernetes only creates the directory once the claim binds,
                // so make it now with the configured mode and ownership.
                if let Some(settings) = &self.directory_settings {
                    if let Err(err) = prepare_directory(&path, settings) {
                        warn!("Error preparing directory {}: {}", path.display(), err);
                    }
                }
            }
        }
    }
}
