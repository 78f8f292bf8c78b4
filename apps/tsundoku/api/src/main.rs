use axum_helpers::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use migration::Migrator;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod lookup;
mod openapi;
mod scheduler;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::run_migrations::<Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

    let state = AppState::new(config, db);

    let scheduler = match state.config.cron.schedule.as_deref() {
        Some(schedule) => Some(scheduler::start(schedule, state.books.clone()).await?),
        None => {
            info!("SWEEP_SCHEDULE not set; sweeps run only via /api/cron/check");
            None
        }
    };

    let app = api::app(&state);

    info!("Starting tsundoku API with graceful shutdown (30s timeout)");

    let db = state.db.clone();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            if let Some(mut scheduler) = scheduler {
                match scheduler.shutdown().await {
                    Ok(()) => info!("Sweep scheduler stopped"),
                    Err(e) => tracing::error!("Error stopping sweep scheduler: {}", e),
                }
            }

            info!("Shutting down: closing database connections");
            match db.close().await {
                Ok(()) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Tsundoku API shutdown complete");
    Ok(())
}
