//! # Axum Helpers
//!
//! Shared HTTP plumbing for the storefront services.
//!
//! ## Modules
//!
//! - **[`server`]**: router assembly with API docs, the [`Server`] object,
//!   health checks, graceful shutdown
//! - **[`http`]**: CORS and security header middleware
//! - **[`errors`]**: [`AppError`] and the JSON error body
//! - **[`extractors`]**: integer path ids, validated JSON, JSON-rejecting
//!   query, multipart uploads
//! - **[`audit`]**: audit events for data changes
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{Server, create_router, shutdown_signal};
//! use core_config::{http::HttpConfig, server::ServerConfig};
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let router = create_router::<ApiDoc>(Router::new(), Router::new(), &HttpConfig::default())?;
//!     let server = Server::bind(router, &ServerConfig::default()).await?;
//!     server.serve_until(shutdown_signal()).await
//! }
//! ```

pub mod audit;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, Server, ServerHandle, ShutdownCoordinator, create_router,
    health_router, run_health_checks, serve_with_cleanup, shutdown_signal,
};

pub use http::{cors_layer, security_headers};

pub use errors::responses::{
    BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
    InternalServerErrorResponse, MessageResponse, NotFoundResponse, PayloadTooLargeResponse,
    ServiceUnavailableResponse, UnauthorizedResponse,
};
pub use errors::{AppError, ErrorCode, ErrorResponse, error_response};

pub use extractors::{ApiQuery, IdPairPath, IdPath, UploadForm, UploadedFile, ValidatedJson, parse_id};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
