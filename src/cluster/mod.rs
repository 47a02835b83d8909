//! Kubernetes adapter
//!
//! Concrete [`VolumeStore`] backed by the cluster's PersistentVolume API.
//! PersistentVolumes are cluster-scoped, so the API handle is unscoped even
//! though each volume's metadata carries the configured namespace.

use crate::domain::ports::VolumeStore;
use crate::error::{Error, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::PersistentVolume;
use kube::api::{Api, PostParams};
use kube::{Client, Config};
use tracing::{debug, info};

/// PersistentVolume API wrapper
pub struct KubeVolumes {
    api: Api<PersistentVolume>,
}

impl KubeVolumes {
    /// Connect to the cluster.
    ///
    /// With `incluster` set, only the in-pod service account environment is
    /// accepted; otherwise the usual kubeconfig inference applies. This
    /// mirrors the deployment split between running inside the hub cluster
    /// and running against it from outside.
    pub async fn connect(incluster: bool) -> Result<Self> {
        let config = if incluster {
            Config::incluster()
                .map_err(|e| Error::Configuration(format!("in-cluster config: {}", e)))?
        } else {
            Config::infer()
                .await
                .map_err(|e| Error::Configuration(format!("kubeconfig inference: {}", e)))?
        };

        let client = Client::try_from(config)?;
        info!("Connected to Kubernetes API");

        Ok(Self {
            api: Api::all(client),
        })
    }

}

#[async_trait]
impl VolumeStore for KubeVolumes {
    async fn create_persistent_volume(&self, pv: &PersistentVolume) -> Result<()> {
        let name = pv.metadata.name.clone().unwrap_or_default();

        match self.api.create(&PostParams::default(), pv).await {
            Ok(_) => {
                debug!("Created PersistentVolume {}", name);
                Ok(())
            }
            Err(kube::Error::Api(resp)) if resp.code == 409 => {
                Err(Error::ResourceExists { name })
            }
            Err(err) => Err(err.into()),
        }
    }
}
