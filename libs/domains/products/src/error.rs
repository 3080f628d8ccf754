use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

use crate::messages;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("{}", messages::PRODUCT_NOT_FOUND)]
    NotFound,

    #[error("{}", messages::PRODUCT_EXISTS)]
    Duplicate,

    #[error("{}", messages::CATEGORY_NOT_FOUND)]
    CategoryNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound => AppError::NotFound(messages::PRODUCT_NOT_FOUND.to_string()),
            // The legacy API contract returns 400, not 409, for a duplicate name
            ProductError::Duplicate => AppError::BadRequest(messages::PRODUCT_EXISTS.to_string()),
            ProductError::CategoryNotFound => {
                AppError::NotFound(messages::CATEGORY_NOT_FOUND.to_string())
            }
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// The products table carries more than one foreign key relation (history
/// rows point back at products), so this blanket conversion only claims
/// the unique-name violation. Writes that reference a category classify
/// their own FK violations at the call site.
impl From<sea_orm::DbErr> for ProductError {
    fn from(err: sea_orm::DbErr) -> Self {
        use sea_orm::SqlErr;

        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ProductError::Duplicate,
            _ => ProductError::Internal(err.to_string()),
        }
    }
}
