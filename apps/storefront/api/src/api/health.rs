//! Readiness check against the real dependencies

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use sea_orm::DatabaseConnection;
use std::path::PathBuf;

#[derive(Clone)]
struct ReadyState {
    db: DatabaseConnection,
    upload_dir: PathBuf,
}

/// `GET /ready`: 200 when the database answers and the upload directory
/// exists, 503 otherwise.
pub fn ready_router(db: DatabaseConnection, upload_dir: PathBuf) -> Router {
    Router::new()
        .route("/ready", get(ready_handler))
        .with_state(ReadyState { db, upload_dir })
}

async fn ready_handler(State(state): State<ReadyState>) -> impl IntoResponse {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
        (
            "database",
            Box::pin(async {
                database::postgres::check_health(&state.db)
                    .await
                    .map_err(|e| format!("Database ping failed: {}", e))
            }),
        ),
        (
            "uploads",
            Box::pin(async {
                match tokio::fs::metadata(&state.upload_dir).await {
                    Ok(meta) if meta.is_dir() => Ok(()),
                    Ok(_) => Err(format!("{} is not a directory", state.upload_dir.display())),
                    Err(e) => Err(format!("{}: {}", state.upload_dir.display(), e)),
                }
            }),
        ),
    ];

    run_health_checks(checks).await
}
