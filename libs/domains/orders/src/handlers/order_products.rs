//! `/api/order-product`

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    ApiQuery, BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse, IdPath,
    InternalServerErrorResponse, MessageResponse, NotFoundResponse, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::OrderResult;
use crate::models::{CreateOrderItem, OrderItem, OrderItemFilter, UpdateOrderItem};
use crate::repository::OrderRepository;
use crate::service::OrderService;

#[derive(OpenApi)]
#[openapi(
    paths(list_items, create_item, get_item, update_item, delete_item),
    components(
        schemas(OrderItem, CreateOrderItem, UpdateOrderItem, MessageResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = "Order Products", description = "Products on an order and their quantities"))
)]
pub struct ApiDoc;

pub fn router<R: OrderRepository + 'static>(service: OrderService<R>) -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/{id}", get(get_item).put(update_item).delete(delete_item))
        .with_state(Arc::new(service))
}

#[utoipa::path(
    get,
    path = "",
    tag = "Order Products",
    params(OrderItemFilter),
    responses(
        (status = 200, description = "Order items", body = Vec<OrderItem>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_items<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    ApiQuery(filter): ApiQuery<OrderItemFilter>,
) -> OrderResult<Json<Vec<OrderItem>>> {
    Ok(Json(service.list_items(filter).await?))
}

/// Add a product to an existing order
#[utoipa::path(
    post,
    path = "",
    tag = "Order Products",
    request_body = CreateOrderItem,
    responses(
        (status = 201, description = "Item added", body = OrderItem),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_item<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateOrderItem>,
) -> OrderResult<impl IntoResponse> {
    let item = service.add_item(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Order Products",
    params(("id" = i64, Path, description = "Order item ID")),
    responses(
        (status = 200, description = "Order item found", body = OrderItem),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_item<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    IdPath(id): IdPath,
) -> OrderResult<Json<OrderItem>> {
    Ok(Json(service.get_item(id).await?))
}

/// Change the quantity of an item
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Order Products",
    params(("id" = i64, Path, description = "Order item ID")),
    request_body = UpdateOrderItem,
    responses(
        (status = 200, description = "Order item updated", body = OrderItem),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_item<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateOrderItem>,
) -> OrderResult<Json<OrderItem>> {
    Ok(Json(service.update_item(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Order Products",
    params(("id" = i64, Path, description = "Order item ID")),
    responses(
        (status = 200, description = "Order item deleted", body = MessageResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_item<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    IdPath(id): IdPath,
) -> OrderResult<Json<MessageResponse>> {
    service.remove_item(id).await?;
    Ok(Json(MessageResponse::new(format!("Order item {} deleted", id))))
}
