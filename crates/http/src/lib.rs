//! HTTP server facade for the catalog service with Axum, error handling, and OpenAPI support.

use std::future::Future;

use anyhow::Context;
use axum::{routing::get, Router};

use catalog_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server and serve until `shutdown` resolves
pub async fn start_server<F>(
    registry: &ModuleRegistry,
    settings: &Settings,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    tracing::info!(%addr, "starting HTTP server");

    let app = build_router(registry, settings);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(registry: &ModuleRegistry, settings: &Settings) -> Router {
    let mut router_builder = RouterBuilder::new().route("/healthz", get(health_check));

    for module in registry.modules() {
        let mount_path = module.mount_path();
        let shown = if mount_path.is_empty() { "/" } else { mount_path.as_str() };
        tracing::info!(module = module.name(), mount_path = shown, "mounting module routes");
        router_builder = router_builder.mount_module(&mount_path, module.routes());
    }

    router_builder
        .with_openapi(registry)
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .build()
}

/// Resolves on Ctrl+C or, on unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}
