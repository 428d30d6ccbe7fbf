//! API routes module

pub mod health;

use axum::Router;
use domain_catalog::handlers::{categories, images, main_image, products, search, slugs, storefront};
use domain_catalog::{CategoryRepository, ImageRepository, ProductRepository};
use domain_orders::OrderRepository;
use domain_users::UserRepository;
use domain_wishlist::WishlistRepository;

use crate::state::Services;

pub use health::ready_router;

/// JSON API routes, nested under `/api` by `create_router`
pub fn routes<C, U, O, W>(services: &Services<C, U, O, W>) -> Router
where
    C: CategoryRepository + ProductRepository + ImageRepository + Clone + 'static,
    U: UserRepository + Clone + 'static,
    O: OrderRepository + Clone + 'static,
    W: WishlistRepository + Clone + 'static,
{
    Router::new()
        .nest("/products", products::router(services.products.clone()))
        .nest("/categories", categories::router(services.categories.clone()))
        .nest("/images", images::router(services.images.clone()))
        .nest("/main-image", main_image::router(services.products.clone()))
        .nest("/slugs", slugs::router(services.products.clone()))
        .nest("/search", search::router(services.products.clone()))
        .nest("/users", domain_users::handlers::router(services.users.clone()))
        .nest(
            "/orders",
            domain_orders::handlers::orders::router(services.orders.clone()),
        )
        .nest(
            "/order-product",
            domain_orders::handlers::order_products::router(services.orders.clone()),
        )
        .nest(
            "/wishlist",
            domain_wishlist::handlers::router(services.wishlist.clone()),
        )
}

/// The HTML storefront page served at `/`
pub fn pages<C, U, O, W>(services: &Services<C, U, O, W>) -> Router
where
    C: CategoryRepository + ProductRepository + ImageRepository + Clone + 'static,
    U: UserRepository,
    O: OrderRepository,
    W: WishlistRepository,
{
    storefront::router(services.categories.clone(), services.products.clone())
}
