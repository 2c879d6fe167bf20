// server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  /// In-process tables; data is lost on restart.
  Memory,
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
      "memory" => Ok(StoreBackend::Memory),
      other => Err(AppError::Config(format!("Invalid STORE_BACKEND: {}", other))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

impl FromStr for LogFormat {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "pretty" | "text" => Ok(LogFormat::Pretty),
      "json" => Ok(LogFormat::Json),
      other => Err(AppError::Config(format!("Invalid LOG_FORMAT: {}", other))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,
  pub run_migrations: bool,
  pub store_backend: StoreBackend,
  pub log_format: LogFormat,
}

impl AppConfig {
  /// Reads `.env` (if present) and the process environment.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Builds the config from any key lookup; every setting has a local-development default.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "0.0.0.0");
    let server_port = parse_var("PORT", &get_or("PORT", "5003"))?;

    let database_url = match lookup("DATABASE_URL") {
      Some(url) => url,
      None => format!(
        "postgres://{}:{}@{}:{}/{}",
        get_or("DB_USERNAME", "postgres"),
        get_or("DB_PASSWORD", "postgres"),
        get_or("DB_HOST", "localhost"),
        parse_var::<u16>("DB_PORT", &get_or("DB_PORT", "5432"))?,
        get_or("DB_NAME", "order_db"),
      ),
    };

    let db_max_connections = parse_var("DB_MAX_CONNECTIONS", &get_or("DB_MAX_CONNECTIONS", "5"))?;
    let run_migrations = parse_var("RUN_MIGRATIONS", &get_or("RUN_MIGRATIONS", "true"))?;
    let store_backend = get_or("STORE_BACKEND", "postgres").parse()?;
    let log_format = get_or("LOG_FORMAT", "pretty").parse()?;

    Ok(Self {
      server_host,
      server_port,
      database_url,
      db_max_connections,
      run_migrations,
      store_backend,
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  raw
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e)))
}
