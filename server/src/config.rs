//! Command-line and environment configuration, and tracing setup.

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::error::ServerError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://users.db?mode=rwc";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Users API server.
#[derive(Clone, Debug, Parser)]
#[command(name = "users-server", version, about)]
pub struct Config {
    /// Interface to bind.
    #[arg(long, env = "USERS_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// SQLite database URL; `sqlite::memory:` keeps users for the life of
    /// the process only.
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Log filter directive, e.g. `info` or `users_server=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "USERS_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Install the global tracing subscriber. Call once, before serving.
pub fn init_tracing(config: &Config) -> Result<(), ServerError> {
    let filter = EnvFilter::try_new(&config.log_level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|err| ServerError::Telemetry(err.to_string()))?;
    tracing::debug!(format = ?config.log_format, "tracing initialized");
    Ok(())
}
