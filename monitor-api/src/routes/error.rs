use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use crate::domain::MonitoringError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ReportAlreadySubmitted,
    PreviousQuarterIncomplete,
    ReportNotPersisted,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<ErrorCode>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: Option<ErrorCode>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<MonitoringError> for ApiError {
    fn from(err: MonitoringError) -> Self {
        match err {
            MonitoringError::ProjectNotFound(_) => Self::not_found(err.to_string()),
            MonitoringError::AlreadySubmitted(_) => {
                Self::conflict(err.to_string()).with_code(ErrorCode::ReportAlreadySubmitted)
            }
            MonitoringError::PreviousQuarterIncomplete { .. } => {
                Self::conflict(err.to_string()).with_code(ErrorCode::PreviousQuarterIncomplete)
            }
            MonitoringError::ReportNotPersisted(_) => {
                Self::conflict(err.to_string()).with_code(ErrorCode::ReportNotPersisted)
            }
            MonitoringError::NotSubmittable { .. }
            | MonitoringError::NotVerifiable { .. }
            | MonitoringError::CommentsClosed { .. } => Self::conflict(err.to_string()),
            MonitoringError::UnknownQuarter(_)
            | MonitoringError::EmptyExpenses
            | MonitoringError::InvalidExpense { .. }
            | MonitoringError::InvalidProgress(_)
            | MonitoringError::InvalidProofFile(_)
            | MonitoringError::EmptyComment
            | MonitoringError::CommentTooLong { .. }
            | MonitoringError::AmountOverflow
            | MonitoringError::BackendRejected(_) => Self::bad_request(err.to_string()),
            MonitoringError::Backend(ref message) => {
                tracing::error!("Portal backend error: {}", message);
                Self::bad_gateway("grants portal request failed")
            }
        }
    }
}
