use actix_web::{web, App, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scheduler_service::config::{Config, DatabaseConfig};
use scheduler_service::db::{ensure_scheduler_tables, PgSchedulerStore, SharedStore};
use scheduler_service::handlers;
use scheduler_service::services::SchedulerService;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(true),
        )
        .init();

    let config = Config::load().context("Failed to load configuration")?;

    info!(
        "Starting scheduler-service v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Environment: {}", config.app.env);

    let store = connect_store(&config.database).await?;
    if store.is_none() {
        warn!("DATABASE_URL not set, running without a store (heuristic mode)");
    }
    if config.scheduler.admin_token.is_none() {
        warn!("ADMIN_TOKEN not set, manual weight overrides are disabled");
    }

    let service = web::Data::new(SchedulerService::new(store, config.scheduler.clone()));

    let bind_addr = format!("{}:{}", config.app.host, config.app.port);
    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(service.clone())
            .configure(handlers::configure)
    })
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .run()
    .await
    .context("HTTP server error")?;

    info!("scheduler-service stopped");
    Ok(())
}

/// Build the store from config.
///
/// The pool connects lazily so an unreachable database at startup still
/// serves fallbacks; only a malformed URL is fatal.
async fn connect_store(db: &DatabaseConfig) -> anyhow::Result<Option<SharedStore>> {
    let Some(url) = db.url.as_deref() else {
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(db.max_connections)
        .acquire_timeout(Duration::from_secs(db.connect_timeout_secs))
        .connect_lazy(url)
        .context("Invalid DATABASE_URL")?;

    if db.ensure_schema {
        match ensure_scheduler_tables(&pool).await {
            Ok(()) => info!("Scheduler tables ready"),
            Err(e) => warn!(error = %e, "Failed to ensure scheduler tables"),
        }
    }

    let store = PgSchedulerStore::new(pool)
        .with_query_timeout(Duration::from_millis(db.query_timeout_ms));

    info!(
        max_connections = db.max_connections,
        query_timeout_ms = db.query_timeout_ms,
        "Store configured"
    );

    Ok(Some(Arc::new(store)))
}
