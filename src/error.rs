use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

use crate::model::leave_request::LeaveStatus;

/// Failures surfaced to API callers. None of these are retried.
#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "Missing or invalid credentials")]
    Unauthorized,

    #[display(fmt = "{}", _0)]
    Forbidden(String),

    #[display(fmt = "{}", _0)]
    NotFound(String),

    #[display(fmt = "End date cannot be before start date")]
    InvalidDateRange,

    #[display(fmt = "Leave request {} is already {}", leave_id, status)]
    InvalidState { leave_id: u64, status: LeaveStatus },

    #[display(
        fmt = "Student does not have enough leave balance. Has {}, needs {}.",
        balance,
        required
    )]
    InsufficientBalance { balance: i32, required: i64 },

    #[display(fmt = "Internal Server Error")]
    Storage(String),
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    /// Stable machine-readable kind, sent alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidDateRange => "invalid_date_range",
            AppError::InvalidState { .. } => "invalid_state",
            AppError::InsufficientBalance { .. } => "insufficient_balance",
            AppError::Storage(_) => "internal",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Storage operation failed");
        AppError::Storage(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidDateRange | AppError::InsufficientBalance { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidState { .. } => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}
