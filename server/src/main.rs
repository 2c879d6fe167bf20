// server/src/main.rs

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use stockroom::config::{AppConfig, LogFormat, StoreBackend};
use stockroom::state::AppState;
use stockroom::store::{MemoryStore, PgStore};
use stockroom::web::configure_app_routes;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE);
  match format {
    LogFormat::Pretty => builder.init(),
    LogFormat::Json => builder.json().init(),
  }
}

async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
  match config.store_backend {
    StoreBackend::Postgres => {
      let store = PgStore::connect(config)
        .await
        .context("Failed to connect to the database")?;
      if config.run_migrations {
        store.migrate().await.context("Failed to run database migrations")?;
      }
      Ok(AppState::with_store(Arc::new(store)))
    }
    StoreBackend::Memory => {
      tracing::warn!("Using the in-memory store; data is lost on restart.");
      Ok(AppState::with_store(Arc::new(MemoryStore::new())))
    }
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;
  init_tracing(app_config.log_format);

  tracing::info!("Starting stockroom server...");

  let server_address = app_config.bind_address();
  let app_state = build_state(&app_config).await?;

  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(Cors::permissive())
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await?;

  Ok(())
}
