use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::models::TotalOverflow;
use crate::store::StorageError;

/// Field-level validation failures, keyed by field name.
/// Serializes transparently as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ValidationFailure(pub BTreeMap<String, Vec<String>>);

impl ValidationFailure {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), vec![message.into()]);
        Self(fields)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

impl From<&validator::ValidationErrors> for ValidationFailure {
    fn from(errors: &validator::ValidationErrors) -> Self {
        let mut fields = BTreeMap::new();
        for (field, errs) in errors.field_errors() {
            let messages = errs
                .iter()
                .map(|err| match &err.message {
                    Some(message) => message.clone().into_owned(),
                    // `required` cannot carry a message of its own, so the
                    // text is supplied here from the error code.
                    None if err.code == "required" => format!("{} is required", field),
                    None => format!("{} is invalid", field),
                })
                .collect();
            fields.insert((*field).to_string(), messages);
        }
        Self(fields)
    }
}

impl From<validator::ValidationErrors> for ValidationFailure {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::from(&errors)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation failed")]
    Validation(ValidationFailure),

    #[error("{0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::Validation(errors.into())
    }
}

// An overflowing total is a property of the submitted numbers, so it is
// reported like any other field failure rather than as a server error.
impl From<TotalOverflow> for ServiceError {
    fn from(err: TotalOverflow) -> Self {
        ServiceError::Validation(ValidationFailure::single("total_value", err.to_string()))
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message carried by the response envelope
    pub fn response_message(&self) -> String {
        match self {
            Self::Validation(_) => "Validation failed".to_string(),
            Self::NotFound(message) => message.clone(),
            Self::Storage(err) => format!("An unexpected error occurred: {}", err),
            Self::Other(err) => format!("An unexpected error occurred: {}", err),
            Self::Forbidden(_) | Self::BadRequest(_) => self.to_string(),
        }
    }
}

/// Error envelope returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "success": false,
    "message": "Validation failed",
    "errors": {"quantity": ["quantity must be an integer of 0 or more"]}
}))]
pub struct ErrorBody {
    pub success: bool,
    /// Human-readable error description
    #[schema(example = "Validation failed")]
    pub message: String,
    /// Field-level validation messages, present only for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationFailure>,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.response_message();
        let errors = match self {
            Self::Validation(failure) => Some(failure),
            _ => None,
        };

        let body = ErrorBody {
            success: false,
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}
