use anyhow::Context;
use catalog_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;

    catalog_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        port = settings.server.port,
        "catalog-app bootstrap starting"
    );

    catalog_app::bootstrap::run(settings).await?;

    tracing::info!("catalog-app shut down");
    Ok(())
}
