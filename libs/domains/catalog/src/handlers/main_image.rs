//! `/api/main-image`: the single distinguished image of a product.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use axum_helpers::{
    AppError, BadRequestIdResponse, BadRequestValidationResponse, IdPath,
    InternalServerErrorResponse, MessageResponse, NotFoundResponse, PayloadTooLargeResponse,
    UploadForm,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::{ImageReplace, ImageUpload, MainImage};
use crate::repository::ProductRepository;
use crate::service::ProductService;

#[derive(OpenApi)]
#[openapi(
    paths(set_main_image, get_main_image, replace_main_image, clear_main_image),
    components(
        schemas(MainImage, ImageUpload, ImageReplace, MessageResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            PayloadTooLargeResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = "Main image", description = "A product's main image"))
)]
pub struct ApiDoc;

pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    Router::new()
        .route("/", post(set_main_image))
        .route(
            "/{product_id}",
            get(get_main_image)
                .put(replace_main_image)
                .delete(clear_main_image),
        )
        .with_state(Arc::new(service))
}

/// Set or replace the main image of a product
#[utoipa::path(
    post,
    path = "",
    tag = "Main image",
    request_body(content = ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Main image stored", body = MainImage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn set_main_image<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    mut form: UploadForm,
) -> Result<(StatusCode, Json<MainImage>), AppError> {
    let product_id: i64 = form.parse_field("product_id")?;
    let file = form.take_file()?;
    let image = service.set_main_image(product_id, file).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

#[utoipa::path(
    get,
    path = "/{product_id}",
    tag = "Main image",
    params(("product_id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Main image", body = MainImage),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_main_image<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(product_id): IdPath,
) -> CatalogResult<Json<MainImage>> {
    Ok(Json(service.get_main_image(product_id).await?))
}

/// Replace an existing main image
#[utoipa::path(
    put,
    path = "/{product_id}",
    tag = "Main image",
    params(("product_id" = i64, Path, description = "Product ID")),
    request_body(content = ImageReplace, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Main image replaced", body = MainImage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn replace_main_image<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(product_id): IdPath,
    mut form: UploadForm,
) -> Result<Json<MainImage>, AppError> {
    let file = form.take_file()?;
    Ok(Json(service.replace_main_image(product_id, file).await?))
}

#[utoipa::path(
    delete,
    path = "/{product_id}",
    tag = "Main image",
    params(("product_id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Main image cleared", body = MessageResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn clear_main_image<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(product_id): IdPath,
) -> CatalogResult<Json<MessageResponse>> {
    service.clear_main_image(product_id).await?;
    Ok(Json(MessageResponse::new(format!(
        "Main image of product {} cleared",
        product_id
    ))))
}
