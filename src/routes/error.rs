use crate::models::responses::{BookResponse, MessageResponse};
use crate::services::catalog::CatalogError;
use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid JSON")]
    InvalidJson,
    #[error("Book Not Found")]
    NotFound,
    #[error("Unprocessable Entity")]
    Validation(Box<BookResponse>),
    #[error("Internal Server Error")]
    Internal,
    #[error(transparent)]
    Body(#[from] BytesRejection),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Body(rejection) => rejection.status(),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => ApiError::NotFound,
            CatalogError::Invalid(book) => ApiError::Validation(book),
            CatalogError::Storage(e) => {
                error!("Storage backend failure: {}", e);
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::Validation(book) => (status, Json(*book)).into_response(),
            ApiError::Body(rejection) => rejection.into_response(),
            other => (status, Json(MessageResponse::new(other.to_string()))).into_response(),
        }
    }
}
