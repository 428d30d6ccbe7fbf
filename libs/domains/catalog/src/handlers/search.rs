//! `/api/search`

use axum::{Json, Router, extract::State, routing::get};
use axum_helpers::{ApiQuery, BadRequestValidationResponse, InternalServerErrorResponse};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::{Product, SearchQuery};
use crate::repository::ProductRepository;
use crate::service::ProductService;

#[derive(OpenApi)]
#[openapi(
    paths(search_products),
    components(
        schemas(Product),
        responses(BadRequestValidationResponse, InternalServerErrorResponse)
    ),
    tags((name = "Search", description = "Product search"))
)]
pub struct ApiDoc;

pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    Router::new()
        .route("/", get(search_products))
        .with_state(Arc::new(service))
}

/// Search products by text, category and price range.
///
/// Text matches the name or description case-insensitively. Price bounds
/// are inclusive. With no parameters every product is returned.
#[utoipa::path(
    get,
    path = "",
    tag = "Search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching products ordered by id", body = Vec<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> CatalogResult<Json<Vec<Product>>> {
    Ok(Json(service.search(query).await?))
}
