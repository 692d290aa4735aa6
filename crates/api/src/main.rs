use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

use sensorhub_api::{
    app, config,
    jobs::{
        JobScheduler, MeasurementRetentionJob, OfflineSweepJob, PoolMetricsJob, RateLimitPruneJob,
    },
    middleware, services,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::Config::load().context("Failed to load configuration")?;

    middleware::init_logging(&config.logging).context("Failed to initialize logging")?;
    middleware::init_metrics().context("Failed to initialize metrics")?;

    info!("Starting SensorHub API v{}", env!("CARGO_PKG_VERSION"));

    let db_config: persistence::db::DatabaseConfig = (&config.database).into();
    let pool = persistence::db::create_pool(&db_config)
        .await
        .context("Failed to connect to database")?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Migrations completed");

    if services::bootstrap_admin(&pool, &config.admin)
        .await
        .context("Admin bootstrap failed")?
    {
        info!("Admin account bootstrapped");
    }

    let addr = config.socket_addr().context("Invalid server address")?;
    let state = app::AppState::from_config(config, pool.clone())
        .context("Failed to build application state")?;
    let jobs_config = state.config.jobs.clone();

    let mut scheduler = JobScheduler::new();
    scheduler.register(OfflineSweepJob::new(
        pool.clone(),
        jobs_config.offline_after_secs,
    ));
    scheduler.register(PoolMetricsJob::new(pool.clone()));
    if jobs_config.measurement_retention_days > 0 {
        scheduler.register(MeasurementRetentionJob::new(
            pool.clone(),
            jobs_config.measurement_retention_days,
        ));
    }
    if let Some(limiter) = &state.rate_limiter {
        scheduler.register(RateLimitPruneJob::new(limiter.clone()));
    }
    scheduler.start();

    let app = app::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("HTTP server stopped");
    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(30)).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
