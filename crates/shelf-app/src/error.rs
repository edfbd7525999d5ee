use std::any::Any;

use axum::{
    extract::rejection::BytesRejection,
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use shelf_dal::ValidationError;
use shelf_types::ErrorBody;
use tracing::{debug, error};

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Dal(#[from] shelf_dal::Error),

    #[error("Request body is missing")]
    MissingBody,

    #[error("Request body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Unsupported media type")]
    UnsupportedMediaType,

    #[error("Cannot read request body: {0}")]
    BodyRejected(#[from] BytesRejection),

    #[error("Invalid ID: {0}")]
    InvalidId(String),

    #[error("Resource not found")]
    RouteNotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        ApiError::Dal(shelf_dal::Error::Validation(value))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Dal(shelf_dal::Error::RecordNotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Dal(shelf_dal::Error::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::MissingBody | ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::BodyRejected(rejection) => rejection.status(),
            ApiError::InvalidId(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::Dal(shelf_dal::Error::RecordNotFound { kind, .. }) => ErrorBody::new(
                self.to_string(),
                format!(
                    "Please check the {} ID and try again",
                    kind.to_lowercase()
                ),
            ),
            ApiError::Dal(shelf_dal::Error::Validation(e)) => validation_body(e),
            ApiError::MissingBody => ErrorBody::new(
                self.to_string(),
                "Please send a JSON object with the item fields",
            ),
            ApiError::InvalidJson(_) => {
                ErrorBody::new(self.to_string(), "Please send a valid JSON object")
            }
            ApiError::UnsupportedMediaType => ErrorBody::new(
                self.to_string(),
                "Content-Type must be application/json",
            ),
            ApiError::BodyRejected(_) => {
                ErrorBody::new(self.to_string(), "Please check the request body")
            }
            ApiError::InvalidId(_) => {
                ErrorBody::new(self.to_string(), "IDs are positive integers")
            }
            ApiError::RouteNotFound => {
                ErrorBody::new(self.to_string(), "Please check the URL and try again")
            }
            ApiError::MethodNotAllowed => ErrorBody::new(
                self.to_string(),
                "This method is not supported on this resource",
            ),
            // detail stays in the log
            ApiError::Internal(_) => ErrorBody::new(
                "Internal server error",
                "Please try again or contact support",
            ),
        }
    }
}

fn validation_body(error: &ValidationError) -> ErrorBody {
    match error {
        ValidationError::MissingFields { required, .. } => {
            ErrorBody::new(error.to_string(), "Please provide all required fields")
                .with_required_fields(required.iter().copied())
        }
        ValidationError::InvalidField { field, .. } => ErrorBody::new(
            error.to_string(),
            format!("Please provide a valid value for '{field}'"),
        ),
        ValidationError::Constraint(_) => {
            ErrorBody::new(error.to_string(), "Please check the field values")
        }
        ValidationError::EmptyUpdate => ErrorBody::new(
            error.to_string(),
            "Please provide at least one field to update",
        ),
        ValidationError::NotAnObject => {
            ErrorBody::new(error.to_string(), "Please send a JSON object")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        } else {
            debug!("Request rejected ({status}): {self}");
        }
        (status, Json(self.body())).into_response()
    }
}

pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}

pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError::Dal(shelf_dal::Error::RecordNotFound {
            kind: "Book",
            id: 999,
        });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        let body = not_found.body();
        assert!(body.error.contains("999"));
        assert!(body.message.contains("book ID"));

        let missing: ApiError = ValidationError::MissingFields {
            missing: vec!["author", "year"],
            required: &["title", "author", "year"],
        }
        .into();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        let body = missing.body();
        assert_eq!(body.error, "Missing required fields: author, year");
        assert_eq!(
            body.required_fields,
            Some(vec!["title".into(), "author".into(), "year".into()])
        );

        assert_eq!(
            ApiError::UnsupportedMediaType.status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[test]
    fn test_internal_detail_hidden() {
        let err = ApiError::Internal("lock poisoned".into());
        let body = err.body();
        assert!(!body.error.contains("poisoned"));
        assert!(!body.message.contains("poisoned"));
    }

    #[test]
    fn test_panic_response() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
