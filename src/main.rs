//! GPFS Provisioner entrypoint
//!
//! Startup order matters: the worker task starts first so the queue drains
//! as soon as items arrive, the reconciliation pass runs to completion
//! before the webhook server binds (reconciled users always precede webhook
//! traffic in the queue), and only then does the listener accept deliveries.

use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gpfs_provisioner::{
    reconcile, work_queue, Args, Error, GithubClient, KubeVolumes, MembershipService, Metrics,
    Provisioner, Result, Settings, WebhookRegistration, WebhookState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Args::parse().into_settings()?;

    init_logging(&settings);

    info!("Starting GPFS provisioner");
    info!("  Version: {}", gpfs_provisioner::VERSION);
    info!("  Organization: {}", settings.github.organization);
    info!("  Namespace: {}", settings.volume.namespace);
    info!("  Base path: {}", settings.volume.base_path.display());
    info!("  In-cluster: {}", settings.incluster);

    let metrics = Metrics::register()?;
    let (queue, receiver) = work_queue();

    // Worker first, so the queue drains from the moment reconciliation
    // starts filling it.
    let store = Arc::new(KubeVolumes::connect(settings.incluster).await?);
    let worker = Provisioner::new(
        store,
        settings.volume.clone(),
        settings.directory,
        metrics.clone(),
    );
    let worker_handle = tokio::spawn(worker.run(receiver));
    info!("Created provisioner task");

    // Fatal on failure: without GitHub there is nothing to provision.
    let github = GithubClient::connect(settings.github.clone()).await?;

    reconcile(&github, &queue, &metrics).await?;

    // Registration failure is survivable; a hook left over from a previous
    // run keeps delivering regardless.
    let registration = WebhookRegistration::organization_events(settings.webhook_url.clone());
    if let Err(err) = github.register_webhook(&registration).await {
        warn!("Failed to register webhook: {}", err);
    }

    info!("Configuring web server");
    let router = gpfs_provisioner::webhook_router(
        &settings.callback_path,
        WebhookState {
            queue: queue.clone(),
            metrics: metrics.clone(),
        },
    );

    let listener = tokio::net::TcpListener::bind(&settings.listen_addr)
        .await
        .map_err(|e| {
            Error::Configuration(format!("failed to bind {}: {}", settings.listen_addr, e))
        })?;
    info!("Starting web server at {}", settings.listen_addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| Error::Internal(format!("web server error: {}", e)))?;

    // Unreachable in practice; the server runs until the process dies.
    drop(queue);
    worker_handle
        .await
        .map_err(|e| Error::Internal(format!("worker task panicked: {}", e)))?;

    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(settings: &Settings) {
    let level = match settings.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("kube=info".parse().unwrap())
        .add_directive("tower=warn".parse().unwrap())
        .add_directive("axum=info".parse().unwrap());

    if settings.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}
