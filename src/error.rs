use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::form::{FieldViolation, ValidationError};

/// Why a prediction request failed, at whichever stage it stopped
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Network failure or timeout talking to the backend
    #[error("prediction backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Backend answered with a non-success status; its body is never read as a result
    #[error("prediction backend returned HTTP {status}")]
    BackendError { status: u16, detail: Option<String> },

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    /// Stable identifier the UI can switch on
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Validation(_) => "validation_error",
            GatewayError::BackendUnavailable(_) => "backend_unavailable",
            GatewayError::BackendError { .. } => "backend_error",
            GatewayError::MalformedResponse(_) => "malformed_response",
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        GatewayError::MalformedResponse(reason.into())
    }

    /// JSON payload sent back to the UI
    pub fn body(&self) -> ErrorBody<'_> {
        ErrorBody {
            error: self.code(),
            message: self.to_string(),
            fields: match self {
                GatewayError::Validation(err) => Some(err.violations.as_slice()),
                _ => None,
            },
            backend_status: match self {
                GatewayError::BackendError { status, .. } => Some(*status),
                _ => None,
            },
            detail: match self {
                GatewayError::BackendError { detail, .. } => detail.as_deref(),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody<'a> {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<&'a [FieldViolation]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<&'a str>,
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::BackendError { .. } | GatewayError::MalformedResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}
