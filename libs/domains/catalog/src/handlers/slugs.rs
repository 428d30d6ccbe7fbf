//! `/api/slugs`

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use axum_helpers::{
    BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
    NotFoundResponse, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::{Product, ProductSlug, RenameSlug};
use crate::repository::ProductRepository;
use crate::service::ProductService;

#[derive(OpenApi)]
#[openapi(
    paths(list_slugs, resolve_slug, rename_slug),
    components(
        schemas(Product, ProductSlug, RenameSlug),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = "Slugs", description = "Human-readable product paths"))
)]
pub struct ApiDoc;

pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    Router::new()
        .route("/", get(list_slugs))
        .route("/{slug}", get(resolve_slug).put(rename_slug))
        .with_state(Arc::new(service))
}

#[utoipa::path(
    get,
    path = "",
    tag = "Slugs",
    responses(
        (status = 200, description = "Every slug with its product", body = Vec<ProductSlug>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_slugs<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> CatalogResult<Json<Vec<ProductSlug>>> {
    Ok(Json(service.list_slugs().await?))
}

/// Resolve a slug to its product
#[utoipa::path(
    get,
    path = "/{slug}",
    tag = "Slugs",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn resolve_slug<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(slug): Path<String>,
) -> CatalogResult<Json<Product>> {
    Ok(Json(service.resolve_slug(&slug).await?))
}

/// Give a product a new slug
#[utoipa::path(
    put,
    path = "/{slug}",
    tag = "Slugs",
    params(("slug" = String, Path, description = "Current product slug")),
    request_body = RenameSlug,
    responses(
        (status = 200, description = "Slug renamed", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn rename_slug<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(slug): Path<String>,
    ValidatedJson(input): ValidatedJson<RenameSlug>,
) -> CatalogResult<Json<Product>> {
    Ok(Json(service.rename_slug(&slug, input).await?))
}
