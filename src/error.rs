//! Typed errors and HTTP mapping.

use crate::model::ListOverflow;
use crate::response::MessageBody;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("resource not found")]
    NotFound,
    #[error("validation: {0}")]
    Validation(String),
    #[error("page out of range")]
    PageOutOfRange(ListOverflow),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

/// Whether a database error is a constraint violation the client caused
/// (duplicate email, dangling enrollment reference, missing required value).
fn is_constraint_violation(e: &sqlx::Error) -> bool {
    use sqlx::error::ErrorKind;
    match e {
        sqlx::Error::Database(db) => matches!(
            db.kind(),
            ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation
        ),
        _ => false,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "resource not found"),
            AppError::Validation(detail) => {
                tracing::debug!(%detail, "request failed validation");
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable")
            }
            AppError::PageOutOfRange(ListOverflow::Unprocessable) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable")
            }
            AppError::PageOutOfRange(ListOverflow::NotFound) => {
                (StatusCode::NOT_FOUND, "resource not found")
            }
            AppError::BadRequest(detail) => {
                tracing::debug!(%detail, "bad request");
                (StatusCode::BAD_REQUEST, "bad request")
            }
            AppError::Db(sqlx::Error::RowNotFound) => (StatusCode::NOT_FOUND, "resource not found"),
            AppError::Db(e) if is_constraint_violation(e) => {
                tracing::debug!(error = %e, "constraint violation");
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable")
            }
            AppError::Db(e) => {
                tracing::error!(error = %e, "database failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };
        let body = MessageBody {
            success: false,
            message: message.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let res = AppError::NotFound.into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_maps_to_422() {
        let res = AppError::Validation("name is required".into()).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn page_overflow_follows_entity_family() {
        let res = AppError::PageOutOfRange(ListOverflow::Unprocessable).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let res = AppError::PageOutOfRange(ListOverflow::NotFound).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn bad_request_maps_to_400() {
        let res = AppError::BadRequest("invalid id".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let res = AppError::Db(sqlx::Error::RowNotFound).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn opaque_db_error_maps_to_500() {
        let res = AppError::Db(sqlx::Error::PoolClosed).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
