//! HTTP mapping for every error kind the service reports.
//!
//! Each kind has a stable machine-readable `code` next to the human `detail`,
//! so clients can tell failures apart without parsing messages.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::calc::operations::CalcError;
use crate::users::error::UserError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Calc(#[from] CalcError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        Self::Rejected {
            status: r.status(),
            message: r.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self {
        Self::Rejected {
            status: r.status(),
            message: r.body_text(),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Calc(_) => StatusCode::BAD_REQUEST,
            Self::User(e) => match e {
                UserError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                UserError::DuplicateUsername | UserError::DuplicateEmail => StatusCode::CONFLICT,
                UserError::NotFound(_) => StatusCode::NOT_FOUND,
                UserError::PersistenceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                UserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Rejected { status, .. } => *status,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Calc(CalcError::InvalidInput) => "invalid_input",
            Self::Calc(CalcError::DivisionByZero) => "division_by_zero",
            Self::Calc(CalcError::OutOfRange) => "out_of_range",
            Self::User(e) => match e {
                UserError::Validation { .. } => "validation_error",
                UserError::DuplicateUsername => "duplicate_username",
                UserError::DuplicateEmail => "duplicate_email",
                UserError::NotFound(_) => "not_found",
                UserError::PersistenceUnavailable(_) => "persistence_unavailable",
                UserError::Internal(_) => "internal_error",
            },
            Self::Rejected { .. } => "invalid_request",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    pub code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = ?self, code = self.code(), "request failed");
        }
        let body = ErrorBody {
            detail: self.to_string(),
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}
