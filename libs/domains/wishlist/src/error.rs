use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WishlistError {
    #[error("Product {product_id} is not on the wishlist of user {user_id}")]
    NotFound { user_id: i64, product_id: i64 },

    #[error("Product {product_id} is already on the wishlist of user {user_id}")]
    Duplicate { user_id: i64, product_id: i64 },

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type WishlistResult<T> = Result<T, WishlistError>;

impl From<WishlistError> for AppError {
    fn from(err: WishlistError) -> Self {
        match err {
            WishlistError::NotFound { .. } => AppError::NotFound(err.to_string()),
            WishlistError::Duplicate { .. } => AppError::Conflict(err.to_string()),
            WishlistError::InvalidReference(msg) | WishlistError::Validation(msg) => {
                AppError::BadRequest(msg)
            }
            WishlistError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for WishlistError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let status = |err: WishlistError| err.into_response().status();
        assert_eq!(
            status(WishlistError::NotFound {
                user_id: 1,
                product_id: 2
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(WishlistError::Duplicate {
                user_id: 1,
                product_id: 2
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(WishlistError::InvalidReference("user 4".into())),
            StatusCode::BAD_REQUEST
        );
    }
}
