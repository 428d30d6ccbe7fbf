//! Server infrastructure: router assembly with API docs, the bindable
//! [`Server`] object, health checks and graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{Server, create_router, health_router};
//! use core_config::{app_info, http::HttpConfig, server::ServerConfig};
//!
//! let app = create_router::<ApiDoc>(
//!     api_routes,
//!     health_router(app_info!()),
//!     &HttpConfig::default(),
//! )?;
//!
//! let server = Server::bind(app, &ServerConfig::default()).await?;
//! server.serve_until(shutdown_signal()).await?;
//! ```

pub mod app;
pub mod health;
pub mod listener;
pub mod shutdown;

pub use app::{create_router, serve_with_cleanup};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use listener::{Server, ServerHandle};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
