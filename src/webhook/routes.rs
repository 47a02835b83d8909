//! Webhook HTTP routes
//!
//! One POST route on the configured callback path plus the usual health and
//! metrics endpoints. Every webhook delivery is acknowledged with the same
//! fixed success body, parse failures included, so GitHub never disables
//! the hook over repeated delivery failures.

use crate::metrics::{self, Metrics};
use crate::queue::WorkQueue;
use crate::webhook::events::{EventKind, OrgAction, OrgEvent, PingEvent, EVENT_HEADER};
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared state for the webhook handlers
#[derive(Clone)]
pub struct WebhookState {
    pub queue: WorkQueue,
    pub metrics: Arc<Metrics>,
}

/// Build the router for the given callback path (no leading slash).
pub fn webhook_router(callback_path: &str, state: WebhookState) -> Router {
    Router::new()
        .route(&format!("/{}", callback_path), post(handle_webhook))
        .route("/healthz", get(healthz))
        .route("/readyz", get(healthz))
        .route("/metrics", get(serve_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The fixed acknowledgement every delivery receives.
fn acknowledge() -> Json<serde_json::Value> {
    Json(json!({ "status": 200 }))
}

// =============================================================================
// Handlers
// =============================================================================

async fn handle_webhook(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: String,
) -> Json<serde_json::Value> {
    let kind = EventKind::from_header(
        headers
            .get(EVENT_HEADER)
            .and_then(|value| value.to_str().ok()),
    );
    state
        .metrics
        .webhook_events
        .with_label_values(&[kind.as_str()])
        .inc();

    match kind {
        EventKind::Ping => handle_ping(&body),
        EventKind::Organization => handle_organization(&state, &body),
        EventKind::Unknown => {
            info!("Ignoring webhook with unrecognized event header");
        }
    }

    acknowledge()
}

fn handle_ping(body: &str) {
    match serde_json::from_str::<PingEvent>(body) {
        Ok(event) => {
            let id = event.hook.and_then(|h| h.id);
            info!("Pinged with hook id {:?}", id);
        }
        Err(err) => warn!("Malformed ping payload: {}", err),
    }
}

fn handle_organization(state: &WebhookState, body: &str) {
    let event: OrgEvent = match serde_json::from_str(body) {
        Ok(event) => event,
        Err(err) => {
            info!("Malformed GitHub payload: {}", err);
            return;
        }
    };

    let (action, login) = match (event.action, event.login()) {
        (Some(action), Some(login)) => (action, login.to_string()),
        _ => {
            info!("Malformed GitHub payload missing action or login");
            return;
        }
    };

    match action {
        OrgAction::MemberInvited => {
            info!("Member {:?} has been invited to the organization", login);
        }
        OrgAction::MemberAdded => {
            info!("Member {:?} has been added to the organization", login);

            // Start provisioning the PersistentVolume once added.
            state.queue.enqueue(login);
            state
                .metrics
                .users_queued
                .with_label_values(&["webhook"])
                .inc();
        }
        OrgAction::MemberRemoved => {
            // Volumes are retained on removal; the Retain reclaim policy
            // keeps the data even if the claim goes away later.
            info!("Member {:?} has been removed from the organization", login);
        }
        OrgAction::Other => {
            info!("Unknown action on organization webhook for {:?}", login);
        }
    }
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn serve_metrics() -> impl IntoResponse {
    match metrics::render() {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::{work_queue, WorkReceiver};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> (Router, WorkReceiver) {
        let (queue, receiver) = work_queue();
        let state = WebhookState {
            queue,
            metrics: Metrics::unregistered(),
        };
        (webhook_router("callback", state), receiver)
    }

    fn webhook_request(event: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/callback")
            .header("content-type", "application/json");
        if let Some(event) = event {
            builder = builder.header(EVENT_HEADER, event);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ping_acknowledged_without_enqueue() {
        let (router, mut receiver) = test_router();

        let response = router
            .oneshot(webhook_request(
                Some("ping"),
                r#"{"hook": {"id": 42}, "zen": "Design for failure."}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": 200}));
        assert_eq!(receiver.try_recv(), None);
    }

    #[tokio::test]
    async fn test_member_added_enqueues_login() {
        let (router, mut receiver) = test_router();

        let response = router
            .oneshot(webhook_request(
                Some("organization"),
                r#"{"action": "member_added", "membership": {"user": {"login": "alice"}}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": 200}));
        assert_eq!(receiver.try_recv().as_deref(), Some("alice"));
        assert_eq!(receiver.try_recv(), None);
    }

    #[tokio::test]
    async fn test_member_removed_logs_only() {
        let (router, mut receiver) = test_router();

        let response = router
            .oneshot(webhook_request(
                Some("organization"),
                r#"{"action": "member_removed", "membership": {"user": {"login": "alice"}}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(receiver.try_recv(), None);
    }

    #[tokio::test]
    async fn test_member_invited_logs_only() {
        let (router, mut receiver) = test_router();

        let response = router
            .oneshot(webhook_request(
                Some("organization"),
                r#"{"action": "member_invited", "membership": {"user": {"login": "alice"}}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(receiver.try_recv(), None);
    }

    #[tokio::test]
    async fn test_missing_login_acknowledged_without_enqueue() {
        let (router, mut receiver) = test_router();

        let response = router
            .oneshot(webhook_request(
                Some("organization"),
                r#"{"action": "member_added"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": 200}));
        assert_eq!(receiver.try_recv(), None);
    }

    #[tokio::test]
    async fn test_invalid_json_still_acknowledged() {
        let (router, mut receiver) = test_router();

        let response = router
            .oneshot(webhook_request(Some("organization"), "not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": 200}));
        assert_eq!(receiver.try_recv(), None);
    }

    #[tokio::test]
    async fn test_unrecognized_event_header_is_noop() {
        let (router, mut receiver) = test_router();

        let response = router
            .oneshot(webhook_request(Some("push"), r#"{"ref": "main"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(receiver.try_recv(), None);
    }

    #[tokio::test]
    async fn test_missing_event_header_is_noop() {
        let (router, mut receiver) = test_router();

        let response = router
            .oneshot(webhook_request(None, r#"{}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(receiver.try_recv(), None);
    }

    #[tokio::test]
    async fn test_healthz() {
        let (router, _receiver) = test_router();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
