//! Prometheus metrics
//!
//! Counters are registered into the default registry once at startup and the
//! webhook router exposes them on `/metrics` in text format.

use crate::error::{Error, Result};
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, TextEncoder};
use std::sync::Arc;

/// Counters shared by the worker and the webhook handlers
pub struct Metrics {
    /// Logins pushed onto the work queue, by source (reconcile/webhook)
    pub users_queued: IntCounterVec,
    /// PersistentVolume create calls that succeeded
    pub provisions_succeeded: IntCounter,
    /// PersistentVolume create calls that failed (including conflicts)
    pub provisions_failed: IntCounter,
    /// Webhook deliveries received, by event kind
    pub webhook_events: IntCounterVec,
}

impl Metrics {
    /// Register all counters into the default registry.
    pub fn register() -> Result<Arc<Self>> {
        let users_queued = IntCounterVec::new(
            Opts::new(
                "gpfs_provisioner_users_queued_total",
                "Logins enqueued for provisioning",
            ),
            &["source"],
        )?;
        let provisions_succeeded = IntCounter::new(
            "gpfs_provisioner_provisions_succeeded_total",
            "Successful PersistentVolume creations",
        )?;
        let provisions_failed = IntCounter::new(
            "gpfs_provisioner_provisions_failed_total",
            "Failed PersistentVolume creations",
        )?;
        let webhook_events = IntCounterVec::new(
            Opts::new(
                "gpfs_provisioner_webhook_events_total",
                "Webhook deliveries by event kind",
            ),
            &["event"],
        )?;

        let registry = prometheus::default_registry();
        registry.register(Box::new(users_queued.clone()))?;
        registry.register(Box::new(provisions_succeeded.clone()))?;
        registry.register(Box::new(provisions_failed.clone()))?;
        registry.register(Box::new(webhook_events.clone()))?;

        Ok(Arc::new(Self {
            users_queued,
            provisions_succeeded,
            provisions_failed,
            webhook_events,
        }))
    }

    /// Unregistered counters for tests, so parallel tests never collide in
    /// the default registry.
    #[cfg(test)]
    pub fn unregistered() -> Arc<Self> {
        Arc::new(Self {
            users_queued: IntCounterVec::new(
                Opts::new("users_queued_total", "test"),
                &["source"],
            )
            .unwrap(),
            provisions_succeeded: IntCounter::new("provisions_succeeded_total", "test").unwrap(),
            provisions_failed: IntCounter::new("provisions_failed_total", "test").unwrap(),
            webhook_events: IntCounterVec::new(
                Opts::new("webhook_events_total", "test"),
                &["event"],
            )
            .unwrap(),
        })
    }
}

impl From<prometheus::Error> for Error {
    fn from(err: prometheus::Error) -> Self {
        Error::Internal(format!("metrics registration failed: {}", err))
    }
}

/// Render the default registry in Prometheus text exposition format.
pub fn render() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| Error::Internal(format!("metrics encoding failed: {}", e)))?;
    String::from_utf8(buffer).map_err(|e| Error::Internal(format!("metrics not UTF-8: {}", e)))
}
