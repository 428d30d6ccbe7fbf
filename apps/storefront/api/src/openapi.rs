//! OpenAPI documentation configuration

use domain_catalog::handlers::{categories, images, main_image, products, search, slugs};
use utoipa::OpenApi;

/// Combined OpenAPI documentation for the Storefront API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "Products, categories, users, orders and wishlists for the storefront",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3001", description = "Local development server")
    ),
    nest(
        (path = "/api/products", api = products::ApiDoc),
        (path = "/api/categories", api = categories::ApiDoc),
        (path = "/api/images", api = images::ApiDoc),
        (path = "/api/main-image", api = main_image::ApiDoc),
        (path = "/api/slugs", api = slugs::ApiDoc),
        (path = "/api/search", api = search::ApiDoc),
        (path = "/api/users", api = domain_users::handlers::ApiDoc),
        (path = "/api/orders", api = domain_orders::handlers::orders::ApiDoc),
        (path = "/api/order-product", api = domain_orders::handlers::order_products::ApiDoc),
        (path = "/api/wishlist", api = domain_wishlist::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
