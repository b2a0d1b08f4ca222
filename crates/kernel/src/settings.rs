use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "BOOKSTALL_ENV";
const CONFIG_DIR_ENV: &str = "BOOKSTALL_CONFIG_DIR";
const ENV_PREFIX: &str = "BOOKSTALL";

/// Signing secret used when nothing else is configured. Refused in production.
pub const DEV_JWT_SECRET: &str = "bookstall-dev-secret-change-me";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
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
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub auth: AuthSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay
    /// and `BOOKSTALL_<SECTION>__<KEY>` variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .with_context(|| "unable to resolve current directory")?
                .join("config"),
        };

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = environment.parse()?;
        settings.validate()?;

        Ok(settings)
    }

    /// Reject combinations that are only acceptable during development.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.environment == Environment::Production && self.auth.jwt_secret == DEV_JWT_SECRET {
            bail!("auth.jwt_secret must be set explicitly in production");
        }
        if self.auth.access_token_ttl_minutes <= 0 {
            bail!("auth.access_token_ttl_minutes must be positive");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
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
        8080
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

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_url")]
    pub url: String,
    #[serde(default = "DatabaseSettings::default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseSettings {
    fn default_url() -> String {
        "sqlite://bookstall.db".to_string()
    }

    fn default_max_connections() -> u32 {
        5
    }

    /// Settings for a private in-memory database, used by tests and dry runs.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            max_connections: Self::default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info".to_string()
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

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "AuthSettings::default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "AuthSettings::default_access_token_ttl_minutes")]
    pub access_token_ttl_minutes: i64,
    #[serde(default = "AuthSettings::default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl AuthSettings {
    fn default_jwt_secret() -> String {
        DEV_JWT_SECRET.to_string()
    }

    fn default_access_token_ttl_minutes() -> i64 {
        30
    }

    fn default_bcrypt_cost() -> u32 {
        12
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: Self::default_jwt_secret(),
            access_token_ttl_minutes: Self::default_access_token_ttl_minutes(),
            bcrypt_cost: Self::default_bcrypt_cost(),
        }
    }
}
