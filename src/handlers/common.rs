use crate::errors::{ServiceError, ValidationFailure};
use axum::{
    async_trait,
    extract::{
        rejection::{JsonDataError, JsonRejection},
        FromRequest, Request,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use std::error::Error;
use validator::Validate;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Validate request input, reporting failures field by field
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input.validate().map_err(ServiceError::from)
}

/// JSON extractor that reports undecodable bodies through the standard
/// error envelope instead of axum's plain-text rejection.
///
/// A body that parses as JSON but carries the wrong type for a field is
/// an input mistake, so it is reported as a field-level validation
/// failure; only unparsable bodies and bad content types are 400s.
pub struct StrictJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for StrictJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::JsonDataError(err)) => {
                Err(ServiceError::Validation(data_error_failure(&err)))
            }
            Err(rejection) => Err(ServiceError::BadRequest(rejection.body_text())),
        }
    }
}

/// Keys a type-mismatch rejection by the field it failed at.
///
/// axum wraps the serde error in `serde_path_to_error`, which records the
/// path into the document; the root path renders as ".".
fn data_error_failure(err: &JsonDataError) -> ValidationFailure {
    let mut source = err.source();
    while let Some(inner) = source {
        if let Some(typed) = inner.downcast_ref::<serde_path_to_error::Error<serde_json::Error>>() {
            let path = typed.path().to_string();
            let field = if path == "." { "body".to_string() } else { path };
            return ValidationFailure::single(field, typed.inner().to_string());
        }
        source = inner.source();
    }
    ValidationFailure::single("body", err.body_text())
}
