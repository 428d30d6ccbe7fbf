//! HTTP handlers for `/api/wishlist`

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    ApiQuery, AuditEvent, AuditOutcome, BadRequestIdResponse, BadRequestValidationResponse,
    ConflictResponse, IdPairPath, IdPath, InternalServerErrorResponse, MessageResponse,
    NotFoundResponse, ValidatedJson,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::WishlistResult;
use crate::models::{AddToWishlist, WishlistFilter, WishlistItem};
use crate::repository::WishlistRepository;
use crate::service::WishlistService;

#[derive(OpenApi)]
#[openapi(
    paths(list_entries, add_entry, list_user_entries, clear_user_entries, get_entry, remove_entry),
    components(
        schemas(WishlistItem, AddToWishlist, MessageResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = "Wishlist", description = "Products saved by users"))
)]
pub struct ApiDoc;

pub fn router<R: WishlistRepository + 'static>(service: WishlistService<R>) -> Router {
    Router::new()
        .route("/", get(list_entries).post(add_entry))
        .route(
            "/{user_id}",
            get(list_user_entries).delete(clear_user_entries),
        )
        .route(
            "/{user_id}/{product_id}",
            get(get_entry).delete(remove_entry),
        )
        .with_state(Arc::new(service))
}

#[utoipa::path(
    get,
    path = "",
    tag = "Wishlist",
    params(WishlistFilter),
    responses(
        (status = 200, description = "Wishlist entries", body = Vec<WishlistItem>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_entries<R: WishlistRepository>(
    State(service): State<Arc<WishlistService<R>>>,
    ApiQuery(filter): ApiQuery<WishlistFilter>,
) -> WishlistResult<Json<Vec<WishlistItem>>> {
    Ok(Json(service.list(filter).await?))
}

#[utoipa::path(
    post,
    path = "",
    tag = "Wishlist",
    request_body = AddToWishlist,
    responses(
        (status = 201, description = "Product saved", body = WishlistItem),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_entry<R: WishlistRepository>(
    State(service): State<Arc<WishlistService<R>>>,
    ValidatedJson(input): ValidatedJson<AddToWishlist>,
) -> WishlistResult<impl IntoResponse> {
    let item = service.add(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Entries of one user, oldest first
#[utoipa::path(
    get,
    path = "/{user_id}",
    tag = "Wishlist",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Wishlist of the user", body = Vec<WishlistItem>),
        (status = 400, response = BadRequestIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_user_entries<R: WishlistRepository>(
    State(service): State<Arc<WishlistService<R>>>,
    IdPath(user_id): IdPath,
) -> WishlistResult<Json<Vec<WishlistItem>>> {
    Ok(Json(service.list_for_user(user_id).await?))
}

/// Remove every entry of a user
#[utoipa::path(
    delete,
    path = "/{user_id}",
    tag = "Wishlist",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Wishlist cleared", body = MessageResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn clear_user_entries<R: WishlistRepository>(
    State(service): State<Arc<WishlistService<R>>>,
    IdPath(user_id): IdPath,
    headers: HeaderMap,
) -> WishlistResult<Json<MessageResponse>> {
    let removed = service.clear(user_id).await?;

    AuditEvent::new("wishlist.clear", AuditOutcome::Success)
        .with_resource("user", user_id)
        .with_request(&headers)
        .with_details(json!({ "removed": removed }))
        .log();

    Ok(Json(MessageResponse::new(format!(
        "Removed {} wishlist entries of user {}",
        removed, user_id
    ))))
}

#[utoipa::path(
    get,
    path = "/{user_id}/{product_id}",
    tag = "Wishlist",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("product_id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Wishlist entry", body = WishlistItem),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_entry<R: WishlistRepository>(
    State(service): State<Arc<WishlistService<R>>>,
    IdPairPath(user_id, product_id): IdPairPath,
) -> WishlistResult<Json<WishlistItem>> {
    Ok(Json(service.get(user_id, product_id).await?))
}

#[utoipa::path(
    delete,
    path = "/{user_id}/{product_id}",
    tag = "Wishlist",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("product_id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Entry removed", body = MessageResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn remove_entry<R: WishlistRepository>(
    State(service): State<Arc<WishlistService<R>>>,
    IdPairPath(user_id, product_id): IdPairPath,
) -> WishlistResult<Json<MessageResponse>> {
    service.remove(user_id, product_id).await?;
    Ok(Json(MessageResponse::new(format!(
        "Product {} removed from the wishlist of user {}",
        product_id, user_id
    ))))
}
