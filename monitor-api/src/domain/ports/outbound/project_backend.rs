use async_trait::async_trait;

use crate::domain::{
    lifecycle::ReportSubmission,
    models::{
        ExpenseItem, Project, ProjectId, ProjectRecord, ProjectStatus, Quarter, ReportId, UserId,
    },
    MonitoringError,
};

/// Outbound port for the grants portal backend.
///
/// Each method is a single backend round-trip; lifecycle rules are enforced
/// by the caller before any of these are invoked.
#[async_trait]
pub trait ProjectBackend: Send + Sync + 'static {
    /// Funded projects, optionally filtered by the viewer's role.
    async fn list_funded_projects(&self, role: Option<&str>)
        -> Result<Vec<Project>, MonitoringError>;

    /// A project with its budget total and persisted report rows.
    async fn get_project(&self, id: ProjectId) -> Result<ProjectRecord, MonitoringError>;

    /// Creates the report row and returns its id.
    ///
    /// Fails with [`MonitoringError::AlreadySubmitted`] when the quarter
    /// already has a row.
    async fn submit_report(
        &self,
        id: ProjectId,
        quarter: Quarter,
        submission: &ReportSubmission,
    ) -> Result<ReportId, MonitoringError>;

    /// Attaches one expense line to a report. Returns the expense row id.
    async fn add_expense(
        &self,
        report_id: ReportId,
        item: &ExpenseItem,
    ) -> Result<i64, MonitoringError>;

    async fn verify_report(
        &self,
        report_id: ReportId,
        verifier: &UserId,
    ) -> Result<(), MonitoringError>;

    /// Returns the created comment's id.
    async fn add_comment(
        &self,
        report_id: ReportId,
        author: &UserId,
        text: &str,
    ) -> Result<i64, MonitoringError>;

    async fn update_project_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
        updated_by: &UserId,
    ) -> Result<(), MonitoringError>;
}
