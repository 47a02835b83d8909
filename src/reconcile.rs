//! Startup membership reconciliation
//!
//! Webhook delivery is best-effort on GitHub's side, so on every startup all
//! current members are enqueued once. Volumes that already exist come back
//! as conflicts from the worker's create call and are dropped there, which
//! makes this pass safe to repeat.

use crate::domain::ports::MembershipService;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::queue::WorkQueue;
use std::sync::Arc;
use tracing::info;

/// Enqueue every current organization member, in listing order.
///
/// Runs before the webhook server binds, so reconciled logins always precede
/// webhook-sourced ones in the queue. A listing failure propagates and
/// aborts startup.
pub async fn reconcile(
    membership: &dyn MembershipService,
    queue: &WorkQueue,
    metrics: &Arc<Metrics>,
) -> Result<usize> {
    info!("Checking existing users' PersistentVolumes");

    let members = membership.list_members().await?;

    for login in &members {
        info!("Queueing user {}", login);
        queue.enqueue(login.clone());
        metrics.users_queued.with_label_values(&["reconcile"]).inc();
    }

    info!("Queued all {} existing users", members.len());
    Ok(members.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::WebhookRegistration;
    use crate::error::Error;
    use crate::queue::work_queue;
    use async_trait::async_trait;
    use assert_matches::assert_matches;

    struct FixedMembers(Vec<String>);

    #[async_trait]
    impl MembershipService for FixedMembers {
        async fn list_members(&self) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }

        async fn register_webhook(&self, _: &WebhookRegistration) -> Result<()> {
            Ok(())
        }
    }

    struct FailingMembers;

    #[async_trait]
    impl MembershipService for FailingMembers {
        async fn list_members(&self) -> Result<Vec<String>> {
            Err(Error::GithubApi {
                status: 401,
                message: "Bad credentials".into(),
            })
        }

        async fn register_webhook(&self, _: &WebhookRegistration) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_enqueues_all_members_in_order() {
        let membership = FixedMembers(vec!["alice".into(), "bob".into(), "carol".into()]);
        let (queue, mut receiver) = work_queue();
        let metrics = Metrics::unregistered();

        let count = reconcile(&membership, &queue, &metrics).await.unwrap();
        drop(queue);

        assert_eq!(count, 3);
        assert_eq!(receiver.recv().await.as_deref(), Some("alice"));
        assert_eq!(receiver.recv().await.as_deref(), Some("bob"));
        assert_eq!(receiver.recv().await.as_deref(), Some("carol"));
        assert_eq!(receiver.recv().await, None);
        assert_eq!(
            metrics.users_queued.with_label_values(&["reconcile"]).get(),
            3
        );
    }

    #[tokio::test]
    async fn test_empty_organization_enqueues_nothing() {
        let membership = FixedMembers(Vec::new());
        let (queue, mut receiver) = work_queue();
        let metrics = Metrics::unregistered();

        let count = reconcile(&membership, &queue, &metrics).await.unwrap();
        drop(queue);

        assert_eq!(count, 0);
        assert_eq!(receiver.recv().await, None);
    }

    #[tokio::test]
    async fn test_listing_error_propagates() {
        let (queue, mut receiver) = work_queue();
        let metrics = Metrics::unregistered();

        let result = reconcile(&FailingMembers, &queue, &metrics).await;
        drop(queue);

        assert_matches!(result, Err(Error::GithubApi { status: 401, .. }));
        assert_eq!(receiver.recv().await, None);
    }
}
