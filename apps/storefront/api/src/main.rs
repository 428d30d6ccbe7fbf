use axum_helpers::serve_with_cleanup;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_with_retry, run_migrations};
use migration::Migrator;
use storefront_api::{AppState, Config, api, build_app};
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before any fallible operation so startup errors are colored too
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = connect_with_retry(&config.database, &config.retry)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        run_migrations::<Migrator>(&db, config.app.name).await?;
    } else {
        info!("Skipping migrations (DB_RUN_MIGRATIONS=false)");
    }

    let state = AppState { config, db };
    let services = state.services();
    services.storage().ensure_dir().await?;

    let ready = api::ready_router(state.db.clone(), state.config.storage.upload_dir.clone());
    let app = build_app(&services, ready, state.config.app.clone(), &state.config.http)?;

    let server = state.config.server.clone();
    let cleanup_timeout = state.config.http.shutdown_timeout;
    info!(address = %server.address(), "Starting Storefront API");

    serve_with_cleanup(app, &server, cleanup_timeout, async move {
        info!("Shutting down: closing database connections");
        match state.db.close().await {
            Ok(()) => info!("PostgreSQL connection closed"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Storefront API shutdown complete");
    Ok(())
}
