use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "CATALOG_ENV";
const CONFIG_DIR_ENV: &str = "CATALOG_CONFIG_DIR";
const ENV_PREFIX: &str = "CATALOG";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub courses: CourseSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay,
    /// and `CATALOG_*` variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .context("unable to resolve current directory")?
                .join("config"),
        };

        Self::load_from(&config_dir, &environment)
    }

    /// Load configuration from `config_dir` for the named environment.
    ///
    /// `base.toml` is read first, then `{environment}.toml`, then environment
    /// variables such as `CATALOG_SERVER__PORT`. Every file is optional.
    pub fn load_from(config_dir: &Path, environment: &str) -> anyhow::Result<Self> {
        let environment: Environment = environment.parse()?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment_name(&environment)));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // The selected environment always wins over a value found in files.
        settings.environment = environment;

        Ok(settings)
    }
}

fn environment_name(environment: &Environment) -> &'static str {
    match environment {
        Environment::Local => "local",
        Environment::Staging => "staging",
        Environment::Production => "production",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        4000
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info,tower_http=info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// How the courses store assigns identifiers to new records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Increasing decimal counter starting past the highest numeric id present.
    #[default]
    Sequential,
    /// Uniform pick among the unused ids in `[0, id_upper_bound)`.
    Random,
}

/// How the courses API reports validation failures and missing records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Error statuses with the standard error envelope.
    #[default]
    Strict,
    /// 200 responses carrying bare JSON string messages, empty bodies for
    /// update/delete misses, and decode failures treated as empty input.
    Legacy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSettings {
    /// Load the two demo courses at startup.
    #[serde(default = "CourseSettings::default_seed")]
    pub seed: bool,
    #[serde(default)]
    pub id_strategy: IdStrategy,
    #[serde(default = "CourseSettings::default_id_upper_bound")]
    pub id_upper_bound: u32,
    #[serde(default)]
    pub response_mode: ResponseMode,
}

impl CourseSettings {
    fn default_seed() -> bool {
        true
    }

    fn default_id_upper_bound() -> u32 {
        100
    }
}

impl Default for CourseSettings {
    fn default() -> Self {
        Self {
            seed: Self::default_seed(),
            id_strategy: IdStrategy::default(),
            id_upper_bound: Self::default_id_upper_bound(),
            response_mode: ResponseMode::default(),
        }
    }
}
