use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::api::ApiError;

/// A validation failure attached to a specific form field, surfaced inline
/// next to the field by the page.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Application-level error type.
/// Serializes as `{code, message, fields}` across the command boundary so
/// pages can branch on `code` (UNAUTHORIZED redirects to login, NOT_FOUND
/// redirects to the dashboard) and place field errors inline.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error")]
    Validation(Vec<FieldError>),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (&'static str, String, Vec<FieldError>) {
        match self {
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone(), vec![]),
            AppError::Validation(fields) => (
                "VALIDATION_ERROR",
                "Validation failed".to_string(),
                fields.clone(),
            ),
            AppError::Unauthorized => {
                ("UNAUTHORIZED", "Authentication required".to_string(), vec![])
            }
            AppError::Api { message, .. } => ("API_ERROR", message.clone(), vec![]),
            AppError::Network(msg) => {
                tracing::error!("Network error: {msg}");
                ("NETWORK_ERROR", "Could not reach the server".to_string(), vec![])
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    vec![],
                )
            }
        }
    }
}

impl Serialize for AppError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (code, message, fields) = self.parts();
        let mut s = serializer.serialize_struct("AppError", 3)?;
        s.serialize_field("code", code)?;
        s.serialize_field("message", &message)?;
        s.serialize_field("fields", &fields)?;
        s.end()
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => AppError::Unauthorized,
            ApiError::NotFound(msg) => AppError::NotFound(msg),
            ApiError::Api { status, message } => AppError::Api { status, message },
            ApiError::Http(e) => AppError::Network(e.to_string()),
        }
    }
}
