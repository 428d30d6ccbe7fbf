//! Storefront API - REST endpoints plus the server-rendered storefront page
//!
//! Routes:
//! - `/api/...` JSON endpoints for every domain, documented at `/swagger-ui`
//! - `/` the storefront home page
//! - `/uploads/<name>` uploaded images
//! - `/health` liveness, `/ready` readiness (passed in by the binary)

pub mod api;
pub mod config;
pub mod openapi;
pub mod state;

use axum::Router;
use axum_helpers::{create_router, health_router};
use core_config::{AppInfo, http::HttpConfig};
use domain_catalog::{CategoryRepository, ImageRepository, ProductRepository};
use domain_orders::OrderRepository;
use domain_users::UserRepository;
use domain_wishlist::WishlistRepository;
use std::io;
use tower_http::services::ServeDir;

pub use config::Config;
pub use state::{AppState, Services};

/// Assembles the whole application. `probes` carries routes that need
/// resources the services don't own, such as the readiness check on a live
/// database connection. Every route, pages and uploads included, sits behind
/// the shared middleware stack.
pub fn build_app<C, U, O, W>(
    services: &Services<C, U, O, W>,
    probes: Router,
    app: AppInfo,
    http: &HttpConfig,
) -> io::Result<Router>
where
    C: CategoryRepository + ProductRepository + ImageRepository + Clone + 'static,
    U: UserRepository + Clone + 'static,
    O: OrderRepository + Clone + 'static,
    W: WishlistRepository + Clone + 'static,
{
    let storage = services.storage().config();
    let site = api::pages(services)
        .merge(health_router(app))
        .merge(probes)
        .nest_service(&storage.public_path, ServeDir::new(&storage.upload_dir));

    create_router::<openapi::ApiDoc>(api::routes(services), site, http)
}
