use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Image not found: {0}")]
    ImageNotFound(i64),

    #[error("No product with slug '{0}'")]
    SlugNotFound(String),

    #[error("Product {0} has no main image")]
    MainImageNotSet(i64),

    #[error("Category '{0}' already exists")]
    DuplicateCategory(String),

    #[error("Slug '{0}' is already taken")]
    DuplicateSlug(String),

    #[error("Category {0} still has products")]
    CategoryInUse(i64),

    #[error("Product {0} is part of existing orders")]
    ProductInUse(i64),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Upload too large: {0}")]
    UploadTooLarge(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CategoryNotFound(_)
            | CatalogError::ProductNotFound(_)
            | CatalogError::ImageNotFound(_)
            | CatalogError::SlugNotFound(_)
            | CatalogError::MainImageNotSet(_) => AppError::NotFound(err.to_string()),
            CatalogError::DuplicateCategory(_)
            | CatalogError::DuplicateSlug(_)
            | CatalogError::CategoryInUse(_)
            | CatalogError::ProductInUse(_) => AppError::Conflict(err.to_string()),
            CatalogError::InvalidReference(msg) | CatalogError::Validation(msg) => {
                AppError::BadRequest(msg)
            }
            CatalogError::UploadTooLarge(msg) => AppError::PayloadTooLarge(msg),
            CatalogError::Database(e) => AppError::Database(e),
            CatalogError::Storage(msg) | CatalogError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: CatalogError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(CatalogError::ProductNotFound(1)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(CatalogError::SlugNotFound("chair".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(CatalogError::CategoryInUse(2)), StatusCode::CONFLICT);
        assert_eq!(
            status_of(CatalogError::DuplicateSlug("chair".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(CatalogError::InvalidReference("category 9".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CatalogError::UploadTooLarge("6 MiB".into())),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_of(CatalogError::Storage("disk full".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
