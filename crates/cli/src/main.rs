use anyhow::Context;
use catalog_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "catalog", version, about = "In-memory course catalog service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the course API (default)
    Serve {
        /// Interface to bind, overriding `server.host`
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overriding `server.port`
        #[arg(long, short)]
        port: Option<u16>,
    },
    /// Print the effective settings as JSON
    Settings,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load catalog settings")?;

    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Settings => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }

            catalog_telemetry::init(&settings.telemetry)?;
            tracing::info!(
                env = ?settings.environment,
                port = settings.server.port,
                "catalog CLI serving"
            );

            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            runtime.block_on(catalog_app::bootstrap::run(settings))
        }
    }
}
