//! HTTP handlers for the users API

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    ApiQuery, AuditEvent, AuditOutcome, BadRequestIdResponse, BadRequestValidationResponse,
    ConflictResponse, IdPath, InternalServerErrorResponse, MessageResponse, NotFoundResponse,
    UnauthorizedResponse, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, LoginRequest, UpdateUser, UserFilter, UserResponse, UserRole};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for the users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, get_user, update_user, delete_user, get_user_by_email, login),
    components(
        schemas(UserResponse, CreateUser, UpdateUser, LoginRequest, UserRole, MessageResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = "Users", description = "User accounts"))
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/login", post(login))
        .route("/email/{email}", get(get_user_by_email))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(Arc::new(service))
}

/// List users ordered by id
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    params(UserFilter),
    responses(
        (status = 200, description = "Users", body = Vec<UserResponse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ApiQuery(filter): ApiQuery<UserFilter>,
) -> UserResult<Json<Vec<UserResponse>>> {
    Ok(Json(service.list_users(filter).await?))
}

/// Create a user. The email is stored lowercased.
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;

    AuditEvent::new("user.create", AuditOutcome::Success)
        .with_resource("user", user.id)
        .with_request(&headers)
        .log();

    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
) -> UserResult<Json<UserResponse>> {
    Ok(Json(service.get_user(id).await?))
}

/// Look a user up by email (case-insensitive)
#[utoipa::path(
    get,
    path = "/email/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "Email address")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user_by_email<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(email): Path<String>,
) -> UserResult<Json<UserResponse>> {
    Ok(Json(service.get_user_by_email(&email).await?))
}

/// Update a user. Only the supplied fields change.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<UserResponse>> {
    let password_changed = input.password.is_some();
    let user = service.update_user(id, input).await?;

    if password_changed {
        AuditEvent::new("user.password_change", AuditOutcome::Success)
            .with_resource("user", id)
            .with_request(&headers)
            .log();
    }

    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
    headers: HeaderMap,
) -> UserResult<Json<MessageResponse>> {
    service.delete_user(id).await?;

    AuditEvent::new("user.delete", AuditOutcome::Success)
        .with_resource("user", id)
        .with_request(&headers)
        .log();

    Ok(Json(MessageResponse::new(format!("User {} deleted", id))))
}

/// Check credentials. No session or token is issued.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials are valid", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<UserResponse>> {
    let email = input.email.clone();
    match service.login(input).await {
        Ok(user) => {
            AuditEvent::new("user.login", AuditOutcome::Success)
                .with_resource("user", user.id)
                .with_request(&headers)
                .log();
            Ok(Json(user))
        }
        Err(err @ UserError::InvalidCredentials) => {
            AuditEvent::new("user.login", AuditOutcome::Failure)
                .with_request(&headers)
                .with_details(serde_json::json!({ "email": email }))
                .log();
            Err(err)
        }
        Err(err) => Err(err),
    }
}
