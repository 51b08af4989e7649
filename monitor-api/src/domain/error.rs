use thiserror::Error;

use super::models::{ProjectId, Quarter, ReportStatus};

/// Errors raised by report lifecycle rules and monitoring operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonitoringError {
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    #[error("unknown quarter: {0}")]
    UnknownQuarter(String),
    #[error("{0} has not been submitted yet")]
    ReportNotPersisted(Quarter),

    // Validation
    #[error("at least one expense item is required")]
    EmptyExpenses,
    #[error("expense item {index}: {reason}")]
    InvalidExpense { index: usize, reason: String },
    #[error("progress must be between 0 and 100, got {0}")]
    InvalidProgress(i32),
    #[error("invalid proof file reference: {0}")]
    InvalidProofFile(String),
    #[error("comment text must not be empty")]
    EmptyComment,
    #[error("comment must be at most {max} characters")]
    CommentTooLong { max: usize },
    #[error("expense totals exceed the supported range")]
    AmountOverflow,

    // Lifecycle
    #[error("{0} has already been submitted")]
    AlreadySubmitted(Quarter),
    #[error("{quarter} cannot be submitted while {status}")]
    NotSubmittable {
        quarter: Quarter,
        status: ReportStatus,
    },
    #[error("{quarter} requires {previous} to be submitted first")]
    PreviousQuarterIncomplete { quarter: Quarter, previous: Quarter },
    #[error("{quarter} cannot be verified while {status}")]
    NotVerifiable {
        quarter: Quarter,
        status: ReportStatus,
    },
    #[error("{quarter} is closed for comments ({status})")]
    CommentsClosed {
        quarter: Quarter,
        status: ReportStatus,
    },

    #[error("backend rejected the request: {0}")]
    BackendRejected(String),
    #[error("backend error: {0}")]
    Backend(String),
}

impl MonitoringError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
