use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Order item not found: {0}")]
    ItemNotFound(i64),

    #[error("Product {product_id} is already part of order {order_id}")]
    DuplicateItem { order_id: i64, product_id: i64 },

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::OrderNotFound(_) | OrderError::ItemNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            OrderError::DuplicateItem { .. } => AppError::Conflict(err.to_string()),
            OrderError::InvalidReference(msg) | OrderError::Validation(msg) => {
                AppError::BadRequest(msg)
            }
            OrderError::Database(e) => AppError::Database(e),
            OrderError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: OrderError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(OrderError::OrderNotFound(1)), StatusCode::NOT_FOUND);
        assert_eq!(status_of(OrderError::ItemNotFound(1)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(OrderError::DuplicateItem {
                order_id: 1,
                product_id: 2
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(OrderError::InvalidReference("order 9".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(OrderError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
