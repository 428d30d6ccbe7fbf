//! `/api/images`: product gallery uploads.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    ApiQuery, AppError, AuditEvent, AuditOutcome, BadRequestIdResponse,
    BadRequestValidationResponse, IdPath, InternalServerErrorResponse, MessageResponse,
    NotFoundResponse, PayloadTooLargeResponse, UploadForm,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::{ImageFilter, ImageReplace, ImageUpload, ProductImage};
use crate::repository::ImageRepository;
use crate::service::ImageService;

#[derive(OpenApi)]
#[openapi(
    paths(list_images, upload_image, get_image, replace_image, delete_image),
    components(
        schemas(ProductImage, ImageUpload, ImageReplace, MessageResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            PayloadTooLargeResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = "Images", description = "Product gallery images"))
)]
pub struct ApiDoc;

pub fn router<R: ImageRepository + 'static>(service: ImageService<R>) -> Router {
    Router::new()
        .route("/", get(list_images).post(upload_image))
        .route(
            "/{id}",
            get(get_image).put(replace_image).delete(delete_image),
        )
        .with_state(Arc::new(service))
}

#[utoipa::path(
    get,
    path = "",
    tag = "Images",
    params(ImageFilter),
    responses(
        (status = 200, description = "Images ordered by id", body = Vec<ProductImage>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_images<R: ImageRepository>(
    State(service): State<Arc<ImageService<R>>>,
    ApiQuery(filter): ApiQuery<ImageFilter>,
) -> CatalogResult<Json<Vec<ProductImage>>> {
    Ok(Json(service.list_images(filter).await?))
}

/// Attach an image to a product
#[utoipa::path(
    post,
    path = "",
    tag = "Images",
    request_body(content = ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored", body = ProductImage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upload_image<R: ImageRepository>(
    State(service): State<Arc<ImageService<R>>>,
    headers: HeaderMap,
    mut form: UploadForm,
) -> Result<impl IntoResponse, AppError> {
    let product_id: i64 = form.parse_field("product_id")?;
    let file = form.take_file()?;
    let image = service.upload_image(product_id, file).await?;

    AuditEvent::new("image.upload", AuditOutcome::Success)
        .with_resource("image", image.id)
        .with_request(&headers)
        .with_details(json!({ "product_id": product_id, "image": image.image }))
        .log();

    Ok((StatusCode::CREATED, Json(image)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Images",
    params(("id" = i64, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image found", body = ProductImage),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_image<R: ImageRepository>(
    State(service): State<Arc<ImageService<R>>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<ProductImage>> {
    Ok(Json(service.get_image(id).await?))
}

/// Replace the stored file of an image
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Images",
    params(("id" = i64, Path, description = "Image ID")),
    request_body(content = ImageReplace, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image replaced", body = ProductImage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn replace_image<R: ImageRepository>(
    State(service): State<Arc<ImageService<R>>>,
    IdPath(id): IdPath,
    mut form: UploadForm,
) -> Result<Json<ProductImage>, AppError> {
    let file = form.take_file()?;
    Ok(Json(service.replace_image(id, file).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Images",
    params(("id" = i64, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image deleted", body = MessageResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_image<R: ImageRepository>(
    State(service): State<Arc<ImageService<R>>>,
    IdPath(id): IdPath,
    headers: HeaderMap,
) -> CatalogResult<Json<MessageResponse>> {
    service.delete_image(id).await?;

    AuditEvent::new("image.delete", AuditOutcome::Success)
        .with_resource("image", id)
        .with_request(&headers)
        .log();

    Ok(Json(MessageResponse::new(format!("Image {} deleted", id))))
}
