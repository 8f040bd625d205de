//! Outbound intake service.
//!
//! Main entry point. Loads configuration, connects the document store and
//! serves the intake API until shutdown.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use outbound_api::{server::shutdown_signal, AppState, Config};
use outbound_core::{DocumentStore, PostgresDocumentStore};
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};

const MAX_CONNECT_RETRIES: u32 = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(2);
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    init_tracing(&config)?;

    info!("Starting outbound intake service");
    info!(
        database_url = %config.database_url_masked(),
        host = %config.host,
        port = config.port,
        max_connections = config.database_max_connections,
        "Configuration loaded"
    );

    let db_pool = create_database_pool(&config).await?;
    info!("Database connection pool established");

    let store = PostgresDocumentStore::new(db_pool.clone());
    store.ensure_collections().await.context("Failed to create collections")?;
    info!("Collections ready");

    let addr = config.parse_server_addr()?;
    let state = AppState::new(Arc::new(store));

    let server_handle = tokio::spawn({
        let request_timeout = config.request_timeout();
        async move {
            if let Err(e) = outbound_api::start_server(state, addr, request_timeout).await {
                error!(error = %e, "Server failed");
            }
        }
    });

    info!(addr = %addr, "Outbound intake is ready");

    shutdown_signal().await;

    tokio::select! {
        _ = tokio::time::sleep(SHUTDOWN_GRACE_PERIOD) => {
            info!("Shutdown grace period expired");
        }
        _ = server_handle => {
            info!("Server stopped");
        }
    }

    db_pool.close().await;
    info!("Database connections closed");

    info!("Outbound intake shutdown complete");
    Ok(())
}

/// Initializes tracing with the configured filter directives.
fn init_tracing(config: &Config) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.rust_log))
        .context("Invalid log filter")?;

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
    Ok(())
}

/// Creates the database connection pool, retrying transient failures.
async fn create_database_pool(config: &Config) -> Result<sqlx::PgPool> {
    let mut retries = 0;

    loop {
        match PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connection_timeout))
            .idle_timeout(Duration::from_secs(config.database_idle_timeout))
            .max_lifetime(Duration::from_secs(config.database_max_lifetime))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => {
                sqlx::query("SELECT 1")
                    .execute(&pool)
                    .await
                    .context("Failed to verify database connection")?;

                return Ok(pool);
            },
            Err(e) if retries < MAX_CONNECT_RETRIES => {
                retries += 1;
                info!(
                    attempt = retries,
                    max_retries = MAX_CONNECT_RETRIES,
                    error = %e,
                    "Database connection failed, retrying"
                );
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
            },
            Err(e) => {
                return Err(e).context("Failed to create database connection pool after retries");
            },
        }
    }
}
