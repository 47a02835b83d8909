//! Domain Ports - trait seams to the two external systems
//!
//! The worker and reconciler are written against these traits; the concrete
//! adapters live in [`crate::cluster`] and [`crate::github`]. Tests swap in
//! recording fakes.

use crate::error::Result;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::PersistentVolume;
use serde::Serialize;

// =============================================================================
// Cluster Side
// =============================================================================

/// Create-only view of the cluster's PersistentVolume API.
#[async_trait]
pub trait VolumeStore: Send + Sync {
    /// Submit a PersistentVolume. Fails with [`crate::error::Error::Kube`]
    /// (409 for an already-provisioned user) on rejection.
    async fn create_persistent_volume(&self, pv: &PersistentVolume) -> Result<()>;
}

// =============================================================================
// Membership Side
// =============================================================================

/// Webhook registration payload sent to the membership service.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookRegistration {
    /// Externally reachable callback URL
    pub url: String,
    /// Payload content type, always "json" here
    pub content_type: String,
    /// Event scope the hook subscribes to
    pub events: Vec<String>,
}

impl WebhookRegistration {
    /// Registration for organization-membership events delivered as JSON.
    pub fn organization_events(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_type: "json".to_string(),
            events: vec!["organization".to_string()],
        }
    }
}

/// Operations against the organization's membership service, already scoped
/// to one organization at construction time.
#[async_trait]
pub trait MembershipService: Send + Sync {
    /// List every current member's login, in the service's listing order.
    /// Pagination is handled by the implementation.
    async fn list_members(&self) -> Result<Vec<String>>;

    /// Register the webhook. Implementations treat "already registered" as
    /// success; any other failure surfaces for the caller to log and ignore.
    async fn register_webhook(&self, registration: &WebhookRegistration) -> Result<()>;
}
