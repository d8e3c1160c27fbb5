// product_search_api/src/main.rs

// Declare modules for the application
mod config;
mod errors;
mod services;
mod state;
mod web;

use crate::config::AppConfig;
use crate::services::ElasticClient;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer}; // Renamed web to actix_data
use anyhow::Context;
use product_search::ProductGateway;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

fn init_tracing() {
  let builder = tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration

  // LOG_FORMAT=json for log shippers; human-readable otherwise.
  if std::env::var("LOG_FORMAT").map(|f| f.eq_ignore_ascii_case("json")).unwrap_or(false) {
    builder.json().init();
  } else {
    builder.init();
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  init_tracing();
  tracing::info!("Starting product search server...");

  let app_config = Arc::new(AppConfig::from_env().context("Failed to load application configuration")?);

  // One engine client for the process lifetime; reqwest pools connections internally.
  let engine = ElasticClient::new(
    &app_config.elasticsearch_url,
    app_config.elasticsearch_index.clone(),
    app_config.elasticsearch_timeout,
  )
  .context("Failed to create search engine client")?;
  engine
    .ping()
    .await
    .with_context(|| format!("Search engine at {} is unreachable", app_config.elasticsearch_url))?;

  let gateway = Arc::new(ProductGateway::new(Arc::new(engine.clone())).with_deadline(app_config.elasticsearch_timeout));

  // Index provisioning happens before any request is served.
  gateway
    .ensure_index()
    .await
    .with_context(|| format!("Failed to provision index '{}'", engine.index()))?;

  if app_config.seed_db {
    tracing::info!(count = app_config.seed_count, "Seeding catalog with synthetic products.");
    services::seed::seed_products(&gateway, app_config.seed_count).await;
  }

  let app_state = AppState { gateway };

  // Configure and Start Actix Web Server
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await
  .context("HTTP server terminated with an error")
}
