//! Application wiring shared by the `catalog-app` binary and the CLI.

use anyhow::Context;
use axum::Router;
use catalog_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// Registry holding every application module, configured from `settings`
pub fn registry(settings: &Settings) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings);
    registry
}

/// The complete HTTP router for `settings`, without binding a socket
pub fn router(settings: &Settings) -> Router {
    catalog_http::build_router(&registry(settings), settings)
}

/// Run the service until Ctrl+C or SIGTERM.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = registry(&settings);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry
        .init_modules(&ctx)
        .await
        .context("module initialization failed")?;
    registry
        .start_modules(&ctx)
        .await
        .context("module startup failed")?;

    let served =
        catalog_http::start_server(&registry, &settings, catalog_http::shutdown_signal()).await;

    registry
        .stop_modules()
        .await
        .context("module shutdown failed")?;

    served
}
