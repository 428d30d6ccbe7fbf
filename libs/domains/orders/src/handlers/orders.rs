//! `/api/orders`

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    ApiQuery, AuditEvent, AuditOutcome, BadRequestIdResponse, BadRequestValidationResponse,
    IdPath, InternalServerErrorResponse, MessageResponse, NotFoundResponse, ValidatedJson,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::OrderResult;
use crate::models::{CreateOrder, Order, OrderFilter, OrderItem, OrderLine, OrderStatus, UpdateOrder};
use crate::repository::OrderRepository;
use crate::service::OrderService;

#[derive(OpenApi)]
#[openapi(
    paths(list_orders, create_order, get_order, update_order, delete_order),
    components(
        schemas(Order, OrderItem, OrderLine, OrderStatus, CreateOrder, UpdateOrder, MessageResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = "Orders", description = "Customer orders"))
)]
pub struct ApiDoc;

pub fn router<R: OrderRepository + 'static>(service: OrderService<R>) -> Router {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/{id}", get(get_order).put(update_order).delete(delete_order))
        .with_state(Arc::new(service))
}

/// List orders ordered by id, each with its items
#[utoipa::path(
    get,
    path = "",
    tag = "Orders",
    params(OrderFilter),
    responses(
        (status = 200, description = "Orders", body = Vec<Order>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_orders<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    ApiQuery(filter): ApiQuery<OrderFilter>,
) -> OrderResult<Json<Vec<Order>>> {
    Ok(Json(service.list_orders(filter).await?))
}

/// Place an order. The order and its items are stored together or not at
/// all.
#[utoipa::path(
    post,
    path = "",
    tag = "Orders",
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateOrder>,
) -> OrderResult<impl IntoResponse> {
    let order = service.create_order(input).await?;

    AuditEvent::new("order.create", AuditOutcome::Success)
        .with_resource("order", order.id)
        .with_request(&headers)
        .with_details(json!({ "items": order.items.len(), "total": order.total }))
        .log();

    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Orders",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    IdPath(id): IdPath,
) -> OrderResult<Json<Order>> {
    Ok(Json(service.get_order(id).await?))
}

/// Update order details or status. Items are left untouched.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Orders",
    params(("id" = i64, Path, description = "Order ID")),
    request_body = UpdateOrder,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateOrder>,
) -> OrderResult<Json<Order>> {
    Ok(Json(service.update_order(id, input).await?))
}

/// Delete an order and its items
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Orders",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    IdPath(id): IdPath,
    headers: HeaderMap,
) -> OrderResult<Json<MessageResponse>> {
    service.delete_order(id).await?;

    AuditEvent::new("order.delete", AuditOutcome::Success)
        .with_resource("order", id)
        .with_request(&headers)
        .log();

    Ok(Json(MessageResponse::new(format!("Order {} deleted", id))))
}
